mod icfg_builder;
mod inter_constprop;
mod inter_solver;

pub use icfg_builder::IcfgBuilder;
pub use inter_constprop::InterConstantPropagation;
pub use inter_solver::InterSolver;
