//! Dead-code detector
//!
//! Breadth-first reachability from the CFG entry. Constant `if`
//! conditions follow only the matching kinded edge, constant switch keys
//! follow the matching case or the default. An assignment is dead when
//! its target is not live afterwards and its right-hand side has no side
//! effect. Unvisited nodes other than the exit are dead.

use crate::features::cfg::domain::{Cfg, CfgEdgeKind};
use crate::features::dataflow::domain::{CPFact, DataflowResult, SetFact};
use crate::features::dataflow::infrastructure::ConstantPropagation;
use crate::ir::stmt::{Stmt, StmtId};
use crate::ir::world::World;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

pub struct DeadCodeDetection<'w> {
    world: &'w World,
}

impl<'w> DeadCodeDetection<'w> {
    pub const ID: &'static str = "deadcode";

    pub fn new(world: &'w World) -> Self {
        Self { world }
    }

    /// Returns the dead statements of the method, ascending by id.
    pub fn analyze(
        &self,
        cfg: &Cfg,
        constants: &DataflowResult<CPFact>,
        live_vars: &DataflowResult<SetFact>,
    ) -> Vec<StmtId> {
        let cp = ConstantPropagation::new(self.world);
        let mut dead: FxHashSet<StmtId> = FxHashSet::default();
        let mut visited: FxHashSet<StmtId> = FxHashSet::default();
        let mut queue: VecDeque<StmtId> = VecDeque::new();
        queue.push_back(cfg.entry());

        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            match self.world.stmt(id) {
                Stmt::If { cond, .. } => {
                    let value = cp.evaluate_condition(cond, constants.in_fact(id));
                    if let Some(c) = value.constant() {
                        for edge in cfg.out_edges_of(id) {
                            if (edge.kind == CfgEdgeKind::IfTrue) == (c != 0) {
                                queue.push_back(edge.target);
                            }
                        }
                    } else {
                        queue.extend(cfg.succs_of(id));
                    }
                }
                Stmt::Switch { key, cases, .. } => {
                    let value = constants.in_fact(id).get(*key);
                    if let Some(c) = value.constant() {
                        let matched = cases.iter().any(|&(v, _)| v == c);
                        for edge in cfg.out_edges_of(id) {
                            let follow = match edge.kind {
                                CfgEdgeKind::SwitchCase(v) => v == c,
                                CfgEdgeKind::SwitchDefault => !matched,
                                _ => false,
                            };
                            if follow {
                                queue.push_back(edge.target);
                            }
                        }
                    } else {
                        queue.extend(cfg.succs_of(id));
                    }
                }
                stmt => {
                    if let Some(lhs) = stmt.def() {
                        if !live_vars.out_fact(id).contains(lhs)
                            && stmt.rhs_has_no_side_effect()
                        {
                            dead.insert(id);
                        }
                    }
                    queue.extend(cfg.succs_of(id));
                }
            }
        }

        for &node in cfg.nodes() {
            if !visited.contains(&node) && !cfg.is_exit(node) {
                dead.insert(node);
            }
        }

        let mut dead: Vec<_> = dead.into_iter().collect();
        dead.sort_unstable();
        dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cfg::infrastructure::CfgBuilder;
    use crate::features::dataflow::infrastructure::{LiveVariableAnalysis, WorkListSolver};
    use crate::ir::builder::WorldBuilder;
    use crate::ir::method::MethodId;
    use crate::ir::stmt::ConditionOp;

    fn run(world: &World, main: MethodId) -> Vec<StmtId> {
        let cfg = CfgBuilder::build(world, main);
        let cp = ConstantPropagation::new(world);
        let constants = WorkListSolver::new(&cp).solve(&cfg);
        let lv = LiveVariableAnalysis::new(world);
        let live = WorkListSolver::new(&lv).solve(&cfg);
        DeadCodeDetection::new(world).analyze(&cfg, &constants, &live)
    }

    #[test]
    fn test_constant_false_branch() {
        let mut b = WorldBuilder::new();
        let a = b.add_class("A", None);
        let main = b.add_static_method(a, "main()", |body| {
            let zero = body.int_var("zero");
            let one = body.int_var("one");
            let x = body.int_var("x");
            body.assign(zero, 0); // 0
            body.assign(one, 1); // 1
            // if (0 == 1) { x = 1 } else { x = 2 }; use(x)
            body.if_goto(ConditionOp::Eq, zero, one, 4); // 2
            body.goto(5); // 3: false path skips the then-branch
            body.assign(x, 1); // 4: dead, condition is constant false
            body.assign(x, 2); // 5
            body.ret(Some(x)); // 6
        });
        let world = b.finish(main);
        let dead = run(&world, main);
        let then_stmt = world.method(main).ir().body_stmts()[4];
        assert_eq!(dead, vec![then_stmt]);
    }

    #[test]
    fn test_constant_switch_follows_matching_case() {
        let mut b = WorldBuilder::new();
        let a = b.add_class("A", None);
        let main = b.add_static_method(a, "main()", |body| {
            let k = body.int_var("k");
            let r = body.int_var("r");
            body.assign(k, 1); // 0
            body.switch(k, vec![(1, 2), (2, 4)], 6); // 1
            body.assign(r, 10); // 2: case 1 (reached)
            body.goto(7); // 3
            body.assign(r, 20); // 4: case 2 (dead)
            body.goto(7); // 5
            body.assign(r, 30); // 6: default (dead)
            body.ret(Some(r)); // 7
        });
        let world = b.finish(main);
        let dead = run(&world, main);
        let body = world.method(main).ir().body_stmts().to_vec();
        assert!(dead.contains(&body[4]));
        assert!(dead.contains(&body[5]));
        assert!(dead.contains(&body[6]));
        assert!(!dead.contains(&body[2]));
    }

    #[test]
    fn test_useless_assignment() {
        let mut b = WorldBuilder::new();
        let a = b.add_class("A", None);
        let main = b.add_static_method(a, "main()", |body| {
            let x = body.int_var("x");
            body.assign(x, 1); // 0: dead, overwritten before any use
            body.assign(x, 2); // 1
            body.ret(Some(x)); // 2
        });
        let world = b.finish(main);
        let dead = run(&world, main);
        let first = world.method(main).ir().body_stmts()[0];
        assert_eq!(dead, vec![first]);
    }

    #[test]
    fn test_side_effect_keeps_assignment() {
        // q = x / y might raise, so it stays even though q is unused
        let mut b = WorldBuilder::new();
        let a = b.add_class("A", None);
        let main = b.add_static_method(a, "main(int,int)", |body| {
            let x = body.param("x", crate::ir::types::Type::int());
            let y = body.param("y", crate::ir::types::Type::int());
            let q = body.int_var("q");
            body.binary(
                q,
                crate::ir::stmt::BinaryOp::Arithmetic(crate::ir::stmt::ArithmeticOp::Div),
                x,
                y,
            );
            body.ret(None);
        });
        let world = b.finish(main);
        let dead = run(&world, main);
        assert!(dead.is_empty());
    }
}
