//! Analysis engines, one vertical slice per feature

pub mod callgraph;
pub mod cfg;
pub mod dataflow;
pub mod deadcode;
pub mod interproc;
pub mod pta;
pub mod taint;
