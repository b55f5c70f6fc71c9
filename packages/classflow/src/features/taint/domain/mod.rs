mod config;
mod flow;

pub use config::{Sink, TaintConfig, TaintTransfer, ARG_BASE, ARG_RESULT};
pub use flow::TaintFlow;
