//! Taint configuration
//!
//! A declarative JSON document with three lists: sources (method → taint
//! type), sinks (method + argument index) and transfers (method + from/to
//! endpoints + re-typed type). Method and type references are resolved
//! against the world eagerly; any unresolved name is a configuration
//! error and the analysis refuses to run.
//!
//! Endpoint encoding: `RESULT` = −2, `BASE` = −1, `ARG<i>` = i.

use crate::errors::{ClassflowError, Result};
use crate::ir::hierarchy::ClassId;
use crate::ir::method::MethodId;
use crate::ir::types::Type;
use crate::ir::world::World;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;

/// Transfer endpoint: the call result
pub const ARG_RESULT: i32 = -2;
/// Transfer endpoint: the receiver
pub const ARG_BASE: i32 = -1;

/// A configured sink: taint reaching the indexed argument is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sink {
    pub method: MethodId,
    pub index: usize,
}

/// A configured taint transfer across a call.
#[derive(Debug, Clone)]
pub struct TaintTransfer {
    pub from: i32,
    pub to: i32,
    pub ty: Type,
}

/// The resolved taint configuration.
#[derive(Debug, Default)]
pub struct TaintConfig {
    pub sources: FxHashMap<MethodId, Type>,
    pub sinks: FxHashMap<MethodId, Vec<Sink>>,
    pub transfers: FxHashMap<MethodId, Vec<TaintTransfer>>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    sources: Vec<RawSource>,
    #[serde(default)]
    sinks: Vec<RawSink>,
    #[serde(default)]
    transfers: Vec<RawTransfer>,
}

#[derive(Debug, Deserialize)]
struct RawMethod {
    class: String,
    method: String,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(flatten)]
    method: RawMethod,
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Debug, Deserialize)]
struct RawSink {
    #[serde(flatten)]
    method: RawMethod,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct RawTransfer {
    #[serde(flatten)]
    method: RawMethod,
    from: String,
    to: String,
    #[serde(rename = "type")]
    ty: String,
}

impl TaintConfig {
    /// Reads and resolves a configuration file.
    pub fn from_file(path: &Path, world: &World) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text, world)
    }

    /// Parses and resolves a configuration document.
    pub fn from_json(text: &str, world: &World) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(text)
            .map_err(|e| ClassflowError::config(format!("malformed taint config: {e}")))?;

        let mut config = TaintConfig::default();
        for source in raw.sources {
            let method = resolve_method(world, &source.method)?;
            let ty = resolve_type(world, &source.ty)?;
            config.sources.insert(method, ty);
        }
        for sink in raw.sinks {
            let method = resolve_method(world, &sink.method)?;
            config.sinks.entry(method).or_default().push(Sink {
                method,
                index: sink.index,
            });
        }
        for transfer in raw.transfers {
            let method = resolve_method(world, &transfer.method)?;
            let ty = resolve_type(world, &transfer.ty)?;
            config.transfers.entry(method).or_default().push(TaintTransfer {
                from: parse_endpoint(&transfer.from)?,
                to: parse_endpoint(&transfer.to)?,
                ty,
            });
        }
        Ok(config)
    }
}

fn resolve_method(world: &World, raw: &RawMethod) -> Result<MethodId> {
    world.lookup_method(&raw.class, &raw.method).ok_or_else(|| {
        ClassflowError::config(format!(
            "unresolved method '{}::{}' in taint config",
            raw.class, raw.method
        ))
    })
}

fn resolve_type(world: &World, name: &str) -> Result<Type> {
    (0..world.hierarchy.class_count() as ClassId)
        .find(|&c| world.hierarchy.class(c).name == name)
        .map(Type::reference)
        .ok_or_else(|| ClassflowError::config(format!("unresolved type '{name}' in taint config")))
}

fn parse_endpoint(s: &str) -> Result<i32> {
    match s {
        "RESULT" => Ok(ARG_RESULT),
        "BASE" => Ok(ARG_BASE),
        _ => s
            .strip_prefix("ARG")
            .and_then(|i| i.parse::<i32>().ok())
            .filter(|&i| i >= 0)
            .ok_or_else(|| {
                ClassflowError::config(format!(
                    "bad transfer endpoint '{s}' (expected BASE, RESULT or ARG<i>)"
                ))
            }),
    }
}
