//! Control-flow graphs
//!
//! Per-method statement-level CFGs with kinded edges, plus the builder
//! that derives them from statement shapes and jump targets.

pub mod domain;
pub mod infrastructure;

pub use domain::{Cfg, CfgEdge, CfgEdgeKind};
pub use infrastructure::CfgBuilder;
