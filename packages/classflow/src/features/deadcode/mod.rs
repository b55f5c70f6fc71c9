//! Dead-code detection
//!
//! A client of constant propagation and live variables: unreachable
//! branches behind constant conditions, plus assignments whose target is
//! never used and whose right-hand side cannot raise.

pub mod infrastructure;

pub use infrastructure::DeadCodeDetection;
