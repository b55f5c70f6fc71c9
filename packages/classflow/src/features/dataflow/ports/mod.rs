//! Analysis seam for the intra-procedural solver

use crate::features::cfg::domain::Cfg;
use crate::ir::stmt::StmtId;

/// An intra-procedural data-flow analysis.
///
/// Direction is abstracted away from transfer functions: `input` is the
/// fact flowing into the statement along the analysis direction (IN for a
/// forward analysis, OUT for a backward one) and `output` is the fact the
/// transfer produces. Every transfer must be monotone in the lattice.
pub trait DataflowAnalysis {
    type Fact: Clone;

    fn is_forward(&self) -> bool;

    /// Fact at the boundary node (the entry for forward, exit for
    /// backward analyses).
    fn new_boundary_fact(&self, cfg: &Cfg) -> Self::Fact;

    fn new_initial_fact(&self) -> Self::Fact;

    /// Meets `fact` into `target`.
    fn meet_into(&self, fact: &Self::Fact, target: &mut Self::Fact);

    /// Applies the node transfer, returning whether `output` changed.
    fn transfer_node(&self, stmt: StmtId, input: &Self::Fact, output: &mut Self::Fact) -> bool;
}
