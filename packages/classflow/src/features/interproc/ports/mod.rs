//! Analysis seam for the inter-procedural solver

use crate::features::interproc::domain::IcfgEdge;
use crate::ir::method::MethodId;
use crate::ir::stmt::StmtId;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// What a node transfer may touch in the running solver: other nodes'
/// OUT facts (for heap-aware value flow) and the worklist (to re-enqueue
/// dependent loads when a store changes).
pub struct InterSolverView<'a, F> {
    out_facts: &'a FxHashMap<StmtId, F>,
    work_list: &'a mut VecDeque<StmtId>,
}

impl<'a, F> InterSolverView<'a, F> {
    pub(crate) fn new(
        out_facts: &'a FxHashMap<StmtId, F>,
        work_list: &'a mut VecDeque<StmtId>,
    ) -> Self {
        Self {
            out_facts,
            work_list,
        }
    }

    /// The OUT fact of another node.
    pub fn out_fact(&self, node: StmtId) -> &F {
        self.out_facts
            .get(&node)
            .expect("every ICFG node has an OUT fact")
    }

    pub fn work_list_add(&mut self, node: StmtId) {
        self.work_list.push_back(node);
    }
}

/// An inter-procedural data-flow analysis over the ICFG.
pub trait InterDataflowAnalysis {
    type Fact: Clone;

    /// Fact at the entry node of an entry method.
    fn new_boundary_fact(&self, method: MethodId) -> Self::Fact;

    fn new_initial_fact(&self) -> Self::Fact;

    fn meet_into(&self, fact: &Self::Fact, target: &mut Self::Fact);

    /// Node transfer; call nodes and non-call nodes are distinguished by
    /// the implementation. Returns whether `output` changed.
    fn transfer_node(
        &self,
        stmt: StmtId,
        input: &Self::Fact,
        output: &mut Self::Fact,
        view: &mut InterSolverView<'_, Self::Fact>,
    ) -> bool;

    /// Edge transfer for the four ICFG edge kinds.
    fn transfer_edge(&self, edge: &IcfgEdge, out: &Self::Fact) -> Self::Fact;
}
