mod analysis;

pub use analysis::TaintAnalysis;
