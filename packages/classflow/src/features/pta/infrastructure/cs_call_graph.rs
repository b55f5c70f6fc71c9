//! Context-sensitive call graph
//!
//! Built on the fly by the solver: reachable (context, method) pairs and
//! kinded edges between context-sensitive call sites and methods, both in
//! discovery order, deduplicated by identity.

use crate::features::callgraph::domain::CallKind;
use crate::features::pta::domain::{CsCallSiteId, CsMethodId};
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CsCallEdge {
    pub kind: CallKind,
    pub call_site: CsCallSiteId,
    pub callee: CsMethodId,
}

#[derive(Debug, Default)]
pub struct CsCallGraph {
    entry_methods: Vec<CsMethodId>,
    reachable: Vec<CsMethodId>,
    reachable_set: FxHashSet<CsMethodId>,
    edges: Vec<CsCallEdge>,
    edge_set: FxHashSet<(CsCallSiteId, CsMethodId)>,
}

impl CsCallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry_method(&mut self, method: CsMethodId) {
        if !self.entry_methods.contains(&method) {
            self.entry_methods.push(method);
        }
    }

    pub fn entry_methods(&self) -> &[CsMethodId] {
        &self.entry_methods
    }

    /// Marks a context-sensitive method reachable; returns whether it was
    /// new. A method is processed exactly once per (method, context).
    pub fn add_reachable_method(&mut self, method: CsMethodId) -> bool {
        if self.reachable_set.insert(method) {
            self.reachable.push(method);
            true
        } else {
            false
        }
    }

    pub fn is_reachable(&self, method: CsMethodId) -> bool {
        self.reachable_set.contains(&method)
    }

    pub fn reachable_methods(&self) -> &[CsMethodId] {
        &self.reachable
    }

    /// Adds an edge, returning whether it was new.
    pub fn add_edge(&mut self, edge: CsCallEdge) -> bool {
        if self.edge_set.insert((edge.call_site, edge.callee)) {
            self.edges.push(edge);
            true
        } else {
            false
        }
    }

    pub fn edges(&self) -> &[CsCallEdge] {
        &self.edges
    }
}
