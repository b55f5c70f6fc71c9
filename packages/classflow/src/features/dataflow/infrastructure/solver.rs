//! Worklist fixpoint solver
//!
//! Forward solving runs a FIFO queue over the CFG; backward solving runs
//! a LIFO stack over the reversed direction. Termination follows from the
//! bounded lattice and monotone transfers.

use crate::features::cfg::domain::Cfg;
use crate::features::dataflow::domain::DataflowResult;
use crate::features::dataflow::ports::DataflowAnalysis;
use std::collections::VecDeque;
use tracing::debug;

pub struct WorkListSolver<'a, A: DataflowAnalysis> {
    analysis: &'a A,
}

impl<'a, A: DataflowAnalysis> WorkListSolver<'a, A> {
    pub fn new(analysis: &'a A) -> Self {
        Self { analysis }
    }

    pub fn solve(&self, cfg: &Cfg) -> DataflowResult<A::Fact> {
        let mut result = DataflowResult::new();
        for &node in cfg.nodes() {
            result.set_in_fact(node, self.analysis.new_initial_fact());
            result.set_out_fact(node, self.analysis.new_initial_fact());
        }
        if self.analysis.is_forward() {
            result.set_out_fact(cfg.entry(), self.analysis.new_boundary_fact(cfg));
            self.solve_forward(cfg, &mut result);
        } else {
            result.set_in_fact(cfg.exit(), self.analysis.new_boundary_fact(cfg));
            self.solve_backward(cfg, &mut result);
        }
        result
    }

    fn solve_forward(&self, cfg: &Cfg, result: &mut DataflowResult<A::Fact>) {
        let mut queue: VecDeque<_> = cfg.nodes().iter().copied().collect();
        let mut pops = 0usize;
        while let Some(node) = queue.pop_front() {
            pops += 1;
            // IN[n] ⊓= OUT[p] for every predecessor p
            let mut in_fact = result
                .in_facts
                .remove(&node)
                .expect("every CFG node has an IN fact");
            for pred in cfg.preds_of(node) {
                self.analysis.meet_into(&result.out_facts[&pred], &mut in_fact);
            }
            let out_fact = result
                .out_facts
                .get_mut(&node)
                .expect("every CFG node has an OUT fact");
            let changed = self.analysis.transfer_node(node, &in_fact, out_fact);
            result.in_facts.insert(node, in_fact);
            if changed {
                queue.extend(cfg.succs_of(node));
            }
        }
        debug!(pops, "forward worklist solve converged");
    }

    fn solve_backward(&self, cfg: &Cfg, result: &mut DataflowResult<A::Fact>) {
        let mut stack: Vec<_> = cfg.nodes().to_vec();
        let mut pops = 0usize;
        while let Some(node) = stack.pop() {
            pops += 1;
            // OUT[n] ⊓= IN[s] for every successor s
            let mut out_fact = result
                .out_facts
                .remove(&node)
                .expect("every CFG node has an OUT fact");
            for succ in cfg.succs_of(node) {
                self.analysis.meet_into(&result.in_facts[&succ], &mut out_fact);
            }
            let in_fact = result
                .in_facts
                .get_mut(&node)
                .expect("every CFG node has an IN fact");
            let changed = self.analysis.transfer_node(node, &out_fact, in_fact);
            result.out_facts.insert(node, out_fact);
            if changed {
                stack.extend(cfg.preds_of(node));
            }
        }
        debug!(pops, "backward worklist solve converged");
    }
}
