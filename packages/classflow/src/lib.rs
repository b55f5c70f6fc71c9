/*
 * classflow - whole-program static analysis core
 *
 * Feature-first architecture over a class-based typed IR:
 * - ir/        : IR facade (types, statements, hierarchy, world, builder)
 * - features/  : vertical slices (dataflow → cfg → callgraph → pta →
 *                taint → interproc → deadcode)
 * - config/    : per-run options (context policy, taint config, result id)
 *
 * The engines:
 * - an intra-procedural worklist framework instantiated for integer
 *   constant propagation and live variables
 * - class-hierarchy call-graph construction
 * - a context-sensitive Andersen-style pointer analysis with pluggable
 *   k-limited context selectors and an on-the-fly call graph
 * - taint tracking as a pointer-analysis plugin
 * - alias-aware inter-procedural constant propagation over an ICFG
 * - a dead-code client of the lattice results
 */

pub mod config;
pub mod errors;
pub mod features;
pub mod ir;

pub use config::{AnalysisOptions, ContextPolicy};
pub use errors::{ClassflowError, Result};

pub use features::callgraph::{CallGraph, CallKind, ChaBuilder};
pub use features::cfg::{Cfg, CfgBuilder, CfgEdgeKind};
pub use features::dataflow::{
    CPFact, ConstantPropagation, DataflowAnalysis, DataflowResult, LiveVariableAnalysis, SetFact,
    Value, WorkListSolver,
};
pub use features::deadcode::DeadCodeDetection;
pub use features::interproc::{IcfgBuilder, InterConstantPropagation, InterSolver};
pub use features::pta::{PointerAnalysis, PointerAnalysisResult, Solver};
pub use features::taint::{TaintAnalysis, TaintConfig, TaintFlow};
pub use ir::{World, WorldBuilder};
