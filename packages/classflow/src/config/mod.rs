//! Per-run analysis configuration
//!
//! Options are validated eagerly: an unknown context policy or a missing
//! taint configuration file refuses the run instead of degrading silently.

use crate::errors::{ClassflowError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Context abstraction used by the pointer analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextPolicy {
    /// Context-insensitive (baseline)
    Insensitive,

    /// k-limiting call-site sensitivity, k ∈ {1, 2}
    CallSite(usize),

    /// k-limiting object sensitivity, k ∈ {1, 2}
    Object(usize),

    /// k-limiting type sensitivity, k ∈ {1, 2}
    Type(usize),
}

impl Default for ContextPolicy {
    fn default() -> Self {
        ContextPolicy::Insensitive
    }
}

impl ContextPolicy {
    /// Parse a policy identifier (`ci`, `1-call`, `2-call`, `1-obj`,
    /// `2-obj`, `1-type`, `2-type`).
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "ci" => Ok(ContextPolicy::Insensitive),
            "1-call" => Ok(ContextPolicy::CallSite(1)),
            "2-call" => Ok(ContextPolicy::CallSite(2)),
            "1-obj" => Ok(ContextPolicy::Object(1)),
            "2-obj" => Ok(ContextPolicy::Object(2)),
            "1-type" => Ok(ContextPolicy::Type(1)),
            "2-type" => Ok(ContextPolicy::Type(2)),
            other => Err(ClassflowError::config(format!(
                "unknown context policy '{other}' \
                 (expected ci, 1-call, 2-call, 1-obj, 2-obj, 1-type or 2-type)"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextPolicy::Insensitive => "ci",
            ContextPolicy::CallSite(1) => "1-call",
            ContextPolicy::CallSite(2) => "2-call",
            ContextPolicy::Object(1) => "1-obj",
            ContextPolicy::Object(2) => "2-obj",
            ContextPolicy::Type(1) => "1-type",
            ContextPolicy::Type(2) => "2-type",
            other => panic!("context policy with unsupported depth: {other:?}"),
        }
    }

    /// Maximum context length this policy can produce.
    pub fn depth(&self) -> usize {
        match self {
            ContextPolicy::Insensitive => 0,
            ContextPolicy::CallSite(k) | ContextPolicy::Object(k) | ContextPolicy::Type(k) => *k,
        }
    }
}

/// Options for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Context abstraction for the pointer analysis
    pub context_policy: ContextPolicy,

    /// Path to the taint configuration document, if taint analysis runs
    pub taint_config: Option<PathBuf>,

    /// Registry id under which the pointer-analysis result is stored and
    /// from which downstream analyses read it
    pub pta_id: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self {
            context_policy: ContextPolicy::Insensitive,
            taint_config: None,
            pta_id: "pta".to_string(),
        }
    }

    pub fn with_context_policy(mut self, policy: &str) -> Result<Self> {
        self.context_policy = ContextPolicy::parse(policy)?;
        Ok(self)
    }

    pub fn with_taint_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.taint_config = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_policies() {
        for (s, depth) in [
            ("ci", 0),
            ("1-call", 1),
            ("2-call", 2),
            ("1-obj", 1),
            ("2-obj", 2),
            ("1-type", 1),
            ("2-type", 2),
        ] {
            let policy = ContextPolicy::parse(s).unwrap();
            assert_eq!(policy.depth(), depth);
            assert_eq!(policy.as_str(), s);
        }
    }

    #[test]
    fn test_parse_unknown_policy() {
        assert!(ContextPolicy::parse("3-call").is_err());
        assert!(ContextPolicy::parse("").is_err());
    }
}
