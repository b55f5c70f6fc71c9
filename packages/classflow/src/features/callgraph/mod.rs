//! Call graphs
//!
//! The method-level call graph shared by clients, and the standalone
//! class-hierarchy-analysis builder. The pointer analysis builds its own
//! context-sensitive call graph on the fly and projects onto this one.

pub mod domain;
pub mod infrastructure;

pub use domain::{CallEdge, CallGraph, CallKind};
pub use infrastructure::ChaBuilder;
