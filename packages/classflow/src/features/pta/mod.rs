//! Context-sensitive pointer analysis
//!
//! An Andersen-style inclusion solver over a pointer-flow graph, with
//! pluggable k-limited context abstractions and an on-the-fly
//! context-sensitive call graph. Plugins (taint) observe new call edges
//! and propagation deltas.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::PointerAnalysis;
pub use domain::{
    ContextElem, ContextTable, CsManager, CtxId, HeapModel, ObjId, Pointer, PointsToSet,
};
pub use infrastructure::{PointerAnalysisResult, PtaStats, Solver};
pub use ports::ContextSelector;
