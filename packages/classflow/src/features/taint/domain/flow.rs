//! Taint flows
//!
//! A witness that data from a tagged source reaches a sink argument.
//! Ordering is (source, sink, index) ascending, so reported flow sets are
//! deterministic.

use crate::ir::stmt::StmtId;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TaintFlow {
    /// The call site that introduced the taint
    pub source_call: StmtId,
    /// The sink call site the taint reached
    pub sink_call: StmtId,
    /// The sink argument index
    pub index: usize,
}
