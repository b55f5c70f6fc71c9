//! CFG model
//!
//! Nodes are statement ids (including the method's synthetic entry/exit
//! pair); edges carry the kind the dead-code client branches on.
//! Successor and predecessor lists keep insertion order so iteration is
//! deterministic.

use crate::ir::method::MethodId;
use crate::ir::stmt::StmtId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// CFG edge kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CfgEdgeKind {
    /// Entry node to the first statement
    Entry,
    /// Sequential flow
    Fallthrough,
    Goto,
    IfTrue,
    IfFalse,
    /// Matched switch case with its value
    SwitchCase(i32),
    SwitchDefault,
    /// Return statement to the exit node
    Return,
}

impl CfgEdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CfgEdgeKind::Entry => "ENTRY",
            CfgEdgeKind::Fallthrough => "FALLTHROUGH",
            CfgEdgeKind::Goto => "GOTO",
            CfgEdgeKind::IfTrue => "IF_TRUE",
            CfgEdgeKind::IfFalse => "IF_FALSE",
            CfgEdgeKind::SwitchCase(_) => "SWITCH_CASE",
            CfgEdgeKind::SwitchDefault => "SWITCH_DEFAULT",
            CfgEdgeKind::Return => "RETURN",
        }
    }
}

/// A kinded CFG edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CfgEdge {
    pub kind: CfgEdgeKind,
    pub source: StmtId,
    pub target: StmtId,
}

/// A per-method control-flow graph.
#[derive(Debug, Clone)]
pub struct Cfg {
    pub method: MethodId,
    entry: StmtId,
    exit: StmtId,
    nodes: Vec<StmtId>,
    out_edges: FxHashMap<StmtId, Vec<CfgEdge>>,
    in_edges: FxHashMap<StmtId, Vec<CfgEdge>>,
}

impl Cfg {
    pub fn new(method: MethodId, entry: StmtId, exit: StmtId, nodes: Vec<StmtId>) -> Self {
        Self {
            method,
            entry,
            exit,
            nodes,
            out_edges: FxHashMap::default(),
            in_edges: FxHashMap::default(),
        }
    }

    pub fn add_edge(&mut self, kind: CfgEdgeKind, source: StmtId, target: StmtId) {
        let edge = CfgEdge {
            kind,
            source,
            target,
        };
        self.out_edges.entry(source).or_default().push(edge);
        self.in_edges.entry(target).or_default().push(edge);
    }

    pub fn entry(&self) -> StmtId {
        self.entry
    }

    pub fn exit(&self) -> StmtId {
        self.exit
    }

    pub fn is_exit(&self, node: StmtId) -> bool {
        node == self.exit
    }

    /// All nodes in statement order, entry first and exit last.
    pub fn nodes(&self) -> &[StmtId] {
        &self.nodes
    }

    pub fn out_edges_of(&self, node: StmtId) -> &[CfgEdge] {
        self.out_edges.get(&node).map_or(&[], Vec::as_slice)
    }

    pub fn in_edges_of(&self, node: StmtId) -> &[CfgEdge] {
        self.in_edges.get(&node).map_or(&[], Vec::as_slice)
    }

    pub fn succs_of(&self, node: StmtId) -> impl Iterator<Item = StmtId> + '_ {
        self.out_edges_of(node).iter().map(|e| e.target)
    }

    pub fn preds_of(&self, node: StmtId) -> impl Iterator<Item = StmtId> + '_ {
        self.in_edges_of(node).iter().map(|e| e.source)
    }

    pub fn edge_count(&self) -> usize {
        self.out_edges.values().map(Vec::len).sum()
    }
}
