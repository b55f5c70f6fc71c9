mod graph;

pub use graph::{CallEdge, CallGraph, CallKind};
