//! Inter-procedural worklist solver
//!
//! FIFO fixpoint over the ICFG. Per pop: apply the edge transfer to each
//! incoming edge's source OUT, meet into IN, run the node transfer, and
//! enqueue successors on change. Node transfers may push extra nodes
//! through the view (alias handling re-enqueues loads when a store
//! changes).

use crate::features::dataflow::domain::DataflowResult;
use crate::features::interproc::domain::Icfg;
use crate::features::interproc::ports::{InterDataflowAnalysis, InterSolverView};
use std::collections::VecDeque;
use tracing::debug;

pub struct InterSolver<'a, A: InterDataflowAnalysis> {
    analysis: &'a A,
    icfg: &'a Icfg,
}

impl<'a, A: InterDataflowAnalysis> InterSolver<'a, A> {
    pub fn new(analysis: &'a A, icfg: &'a Icfg) -> Self {
        Self { analysis, icfg }
    }

    pub fn solve(&self) -> DataflowResult<A::Fact> {
        let mut result = DataflowResult::new();
        for &node in self.icfg.nodes() {
            result.set_in_fact(node, self.analysis.new_initial_fact());
            result.set_out_fact(node, self.analysis.new_initial_fact());
        }
        for &method in self.icfg.entry_methods() {
            let entry = self.icfg.entry_of(method);
            result.set_out_fact(entry, self.analysis.new_boundary_fact(method));
        }

        let mut work_list: VecDeque<_> = self.icfg.nodes().iter().copied().collect();
        let mut pops = 0usize;
        while let Some(node) = work_list.pop_front() {
            pops += 1;
            let mut in_fact = result
                .in_facts
                .remove(&node)
                .expect("every ICFG node has an IN fact");
            for edge in self.icfg.in_edges_of(node) {
                let source_out = &result.out_facts[&edge.source];
                let edge_fact = self.analysis.transfer_edge(edge, source_out);
                self.analysis.meet_into(&edge_fact, &mut in_fact);
            }
            let mut out_fact = result
                .out_facts
                .remove(&node)
                .expect("every ICFG node has an OUT fact");
            let changed = {
                let mut view = InterSolverView::new(&result.out_facts, &mut work_list);
                self.analysis
                    .transfer_node(node, &in_fact, &mut out_fact, &mut view)
            };
            result.in_facts.insert(node, in_fact);
            result.out_facts.insert(node, out_fact);
            if changed {
                work_list.extend(self.icfg.succs_of(node).iter().copied());
            }
        }
        debug!(pops, "inter-procedural worklist solve converged");
        result
    }
}
