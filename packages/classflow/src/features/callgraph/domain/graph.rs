//! Method-level call graph
//!
//! Reachable methods plus deduplicated kinded edges. Insertion order is
//! kept everywhere so clients iterate deterministically.

use crate::ir::method::MethodId;
use crate::ir::stmt::{InvokeKind, Stmt, StmtId};
use crate::ir::world::World;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// How a resolved call dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallKind {
    Static,
    Special,
    Virtual,
    Interface,
    Dynamic,
}

impl From<InvokeKind> for CallKind {
    fn from(kind: InvokeKind) -> Self {
        match kind {
            InvokeKind::Static => CallKind::Static,
            InvokeKind::Special => CallKind::Special,
            InvokeKind::Virtual => CallKind::Virtual,
            InvokeKind::Interface => CallKind::Interface,
            InvokeKind::Dynamic => CallKind::Dynamic,
        }
    }
}

/// A resolved call edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallEdge {
    pub kind: CallKind,
    pub call_site: StmtId,
    pub callee: MethodId,
}

/// Reachable methods and resolved edges.
#[derive(Debug, Default)]
pub struct CallGraph {
    entry_methods: Vec<MethodId>,
    reachable: Vec<MethodId>,
    reachable_set: FxHashSet<MethodId>,
    edges: Vec<CallEdge>,
    edge_set: FxHashSet<(StmtId, MethodId)>,
    callees: FxHashMap<StmtId, Vec<MethodId>>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry_method(&mut self, method: MethodId) {
        if !self.entry_methods.contains(&method) {
            self.entry_methods.push(method);
        }
    }

    pub fn entry_methods(&self) -> &[MethodId] {
        &self.entry_methods
    }

    /// Marks a method reachable, returning whether it was new.
    pub fn add_reachable_method(&mut self, method: MethodId) -> bool {
        if self.reachable_set.insert(method) {
            self.reachable.push(method);
            true
        } else {
            false
        }
    }

    pub fn is_reachable(&self, method: MethodId) -> bool {
        self.reachable_set.contains(&method)
    }

    pub fn reachable_methods(&self) -> &[MethodId] {
        &self.reachable
    }

    /// Adds an edge, returning whether it was new. Edges are deduplicated
    /// by (call site, callee).
    pub fn add_edge(&mut self, edge: CallEdge) -> bool {
        if self.edge_set.insert((edge.call_site, edge.callee)) {
            self.callees
                .entry(edge.call_site)
                .or_default()
                .push(edge.callee);
            self.edges.push(edge);
            true
        } else {
            false
        }
    }

    pub fn edges(&self) -> &[CallEdge] {
        &self.edges
    }

    pub fn callees_of(&self, call_site: StmtId) -> &[MethodId] {
        self.callees.get(&call_site).map_or(&[], Vec::as_slice)
    }

    /// The invoke statements in a method's body.
    pub fn call_sites_in<'w>(
        world: &'w World,
        method: MethodId,
    ) -> impl Iterator<Item = StmtId> + 'w {
        world
            .method(method)
            .ir()
            .body_stmts()
            .iter()
            .copied()
            .filter(|&id| matches!(world.stmt(id), Stmt::Invoke(_)))
            .collect::<Vec<_>>()
            .into_iter()
    }
}
