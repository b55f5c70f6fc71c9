//! Pointer-analysis driver

use crate::config::AnalysisOptions;
use crate::errors::Result;
use crate::features::pta::infrastructure::{PointerAnalysisResult, Solver};
use crate::ir::world::World;

pub struct PointerAnalysis;

impl PointerAnalysis {
    pub const ID: &'static str = "pta";

    /// Runs the solver configured by `options`.
    pub fn run(world: &World, options: &AnalysisOptions) -> Result<PointerAnalysisResult> {
        Solver::new(world, options)?.solve()
    }

    /// Runs the solver and stores the result in the world registry under
    /// the configured id (plus the taint flows under the taint id when
    /// taint analysis ran).
    pub fn run_and_store(world: &mut World, options: &AnalysisOptions) -> Result<()> {
        let result = Self::run(world, options)?;
        if options.taint_config.is_some() {
            world.store_result(
                crate::features::taint::infrastructure::TaintAnalysis::ID,
                result.taint_flows().to_vec(),
            );
        }
        world.store_result(options.pta_id.clone(), result);
        Ok(())
    }
}
