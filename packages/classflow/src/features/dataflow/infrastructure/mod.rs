mod constant_propagation;
mod live_vars;
mod solver;

pub use constant_propagation::ConstantPropagation;
pub use live_vars::LiveVariableAnalysis;
pub use solver::WorkListSolver;
