//! Intra-procedural data-flow framework
//!
//! A generic worklist fixpoint solver over per-method CFGs, instantiated
//! for constant propagation (forward) and live variables (backward).

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{CPFact, DataflowResult, SetFact, Value};
pub use infrastructure::{ConstantPropagation, LiveVariableAnalysis, WorkListSolver};
pub use ports::DataflowAnalysis;
