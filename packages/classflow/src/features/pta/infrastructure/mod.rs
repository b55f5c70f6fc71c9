mod cs_call_graph;
mod pfg;
mod result;
mod selectors;
mod solver;
mod worklist;

pub use cs_call_graph::{CsCallEdge, CsCallGraph};
pub use pfg::PointerFlowGraph;
pub use result::PointerAnalysisResult;
pub use selectors::{
    selector_for, CallSiteSensitive, ContextInsensitive, ObjectSensitive, TypeSensitive,
};
pub use solver::{PtaStats, Solver};
pub use worklist::WorkList;
