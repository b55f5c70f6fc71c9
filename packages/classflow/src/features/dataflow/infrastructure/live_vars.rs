//! Live-variable analysis
//!
//! Backward may-analysis: IN = use ∪ (OUT − def). Consumed by the
//! dead-code client to find useless assignments.

use crate::features::cfg::domain::Cfg;
use crate::features::dataflow::domain::SetFact;
use crate::features::dataflow::ports::DataflowAnalysis;
use crate::ir::stmt::StmtId;
use crate::ir::world::World;

pub struct LiveVariableAnalysis<'w> {
    world: &'w World,
}

impl<'w> LiveVariableAnalysis<'w> {
    pub const ID: &'static str = "livevars";

    pub fn new(world: &'w World) -> Self {
        Self { world }
    }
}

impl DataflowAnalysis for LiveVariableAnalysis<'_> {
    type Fact = SetFact;

    fn is_forward(&self) -> bool {
        false
    }

    fn new_boundary_fact(&self, _cfg: &Cfg) -> SetFact {
        SetFact::new()
    }

    fn new_initial_fact(&self) -> SetFact {
        SetFact::new()
    }

    fn meet_into(&self, fact: &SetFact, target: &mut SetFact) {
        target.union(fact);
    }

    fn transfer_node(&self, stmt_id: StmtId, input: &SetFact, output: &mut SetFact) -> bool {
        // input is OUT, output is IN for this backward analysis
        let stmt = self.world.stmt(stmt_id);
        let mut fresh = input.clone();
        if let Some(def) = stmt.def() {
            fresh.remove(def);
        }
        for used in stmt.uses() {
            fresh.add(used);
        }
        if *output != fresh {
            *output = fresh;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cfg::infrastructure::CfgBuilder;
    use crate::features::dataflow::infrastructure::solver::WorkListSolver;
    use crate::ir::builder::WorldBuilder;
    use crate::ir::stmt::{ArithmeticOp, BinaryOp};

    #[test]
    fn test_redefined_var_not_live_before() {
        let mut b = WorldBuilder::new();
        let a = b.add_class("A", None);
        let mut vars = (0, 0);
        let main = b.add_static_method(a, "main()", |body| {
            let x = body.int_var("x");
            let y = body.int_var("y");
            vars = (x, y);
            body.assign(x, 1); // 0: dead store, x redefined before use
            body.assign(x, 2); // 1
            body.binary(y, BinaryOp::Arithmetic(ArithmeticOp::Add), x, x); // 2
            body.ret(Some(y)); // 3
        });
        let world = b.finish(main);
        let cfg = CfgBuilder::build(&world, main);
        let lv = LiveVariableAnalysis::new(&world);
        let result = WorkListSolver::new(&lv).solve(&cfg);

        let (x, _) = vars;
        let ir = world.method(main).ir();
        let first = ir.body_stmts()[0];
        let second = ir.body_stmts()[1];
        // x is not live right after the first assignment...
        assert!(!result.out_fact(first).contains(x));
        // ...but is live after the second
        assert!(result.out_fact(second).contains(x));
    }
}
