//! Inter-procedural data-flow analysis
//!
//! An ICFG-driven worklist solver with four edge-transfer functions,
//! instantiated for alias-aware constant propagation on top of the
//! pointer-analysis result.

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{Icfg, IcfgEdge, IcfgEdgeKind};
pub use infrastructure::{IcfgBuilder, InterConstantPropagation, InterSolver};
pub use ports::{InterDataflowAnalysis, InterSolverView};
