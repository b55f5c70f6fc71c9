//! Inter-procedural control-flow graph
//!
//! Statement-level graph spanning every reachable method. Edges come in
//! four kinds: normal intra-procedural flow, call-to-return flow around a
//! call site, call edges into callee entries and return edges from callee
//! exits back to the return sites (carrying the callee's return
//! variables).

use crate::ir::method::{MethodId, VarId};
use crate::ir::stmt::StmtId;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IcfgEdgeKind {
    Normal,
    /// Around a call site; the call result is killed on this edge
    CallToReturn,
    /// Call site → callee entry
    Call { callee: MethodId },
    /// Callee exit → return site
    Return {
        call_site: StmtId,
        callee: MethodId,
        return_vars: Vec<VarId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcfgEdge {
    pub kind: IcfgEdgeKind,
    pub source: StmtId,
    pub target: StmtId,
}

#[derive(Debug, Default)]
pub struct Icfg {
    nodes: Vec<StmtId>,
    in_edges: FxHashMap<StmtId, Vec<IcfgEdge>>,
    succs: FxHashMap<StmtId, Vec<StmtId>>,
    entry_methods: Vec<MethodId>,
    method_entries: FxHashMap<MethodId, StmtId>,
    method_exits: FxHashMap<MethodId, StmtId>,
}

impl Icfg {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_method(&mut self, method: MethodId, entry: StmtId, exit: StmtId, nodes: &[StmtId]) {
        self.method_entries.insert(method, entry);
        self.method_exits.insert(method, exit);
        self.nodes.extend_from_slice(nodes);
    }

    pub(crate) fn add_entry_method(&mut self, method: MethodId) {
        if !self.entry_methods.contains(&method) {
            self.entry_methods.push(method);
        }
    }

    pub(crate) fn add_edge(&mut self, edge: IcfgEdge) {
        self.succs.entry(edge.source).or_default().push(edge.target);
        self.in_edges.entry(edge.target).or_default().push(edge);
    }

    pub fn nodes(&self) -> &[StmtId] {
        &self.nodes
    }

    pub fn in_edges_of(&self, node: StmtId) -> &[IcfgEdge] {
        self.in_edges.get(&node).map_or(&[], Vec::as_slice)
    }

    pub fn succs_of(&self, node: StmtId) -> &[StmtId] {
        self.succs.get(&node).map_or(&[], Vec::as_slice)
    }

    pub fn entry_methods(&self) -> &[MethodId] {
        &self.entry_methods
    }

    pub fn entry_of(&self, method: MethodId) -> StmtId {
        self.method_entries[&method]
    }

    pub fn exit_of(&self, method: MethodId) -> StmtId {
        self.method_exits[&method]
    }
}
