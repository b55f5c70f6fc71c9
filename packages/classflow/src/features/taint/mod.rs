//! Taint analysis
//!
//! A plugin attached to the pointer-analysis solver: configured sources
//! seed synthetic taint objects, transfers forward re-typed taints across
//! calls without entering the callee, sinks collect the flows that reach
//! their arguments.

pub mod domain;
pub mod infrastructure;

pub use domain::{Sink, TaintConfig, TaintFlow, TaintTransfer};
pub use infrastructure::TaintAnalysis;
