//! CFG construction
//!
//! Derives a method's control-flow edges from statement shapes: branches
//! split into kinded true/false edges, switches fan out per case, returns
//! edge to the synthetic exit, everything else falls through.

use crate::features::cfg::domain::{Cfg, CfgEdgeKind};
use crate::ir::method::MethodId;
use crate::ir::stmt::Stmt;
use crate::ir::world::World;

pub struct CfgBuilder;

impl CfgBuilder {
    /// Builds the CFG of a method with a body.
    pub fn build(world: &World, method: MethodId) -> Cfg {
        let ir = world.method(method).ir();
        let mut cfg = Cfg::new(method, ir.entry, ir.exit, ir.stmts.clone());

        let body = ir.body_stmts();
        if body.is_empty() {
            cfg.add_edge(CfgEdgeKind::Entry, ir.entry, ir.exit);
            return cfg;
        }
        cfg.add_edge(CfgEdgeKind::Entry, ir.entry, body[0]);

        for (i, &id) in body.iter().enumerate() {
            // the statement after this one in layout order, exit if last
            let next = body.get(i + 1).copied().unwrap_or(ir.exit);
            match world.stmt(id) {
                Stmt::If { target, .. } => {
                    cfg.add_edge(CfgEdgeKind::IfTrue, id, *target);
                    cfg.add_edge(CfgEdgeKind::IfFalse, id, next);
                }
                Stmt::Goto { target } => {
                    cfg.add_edge(CfgEdgeKind::Goto, id, *target);
                }
                Stmt::Switch {
                    cases,
                    default_target,
                    ..
                } => {
                    for &(value, target) in cases {
                        cfg.add_edge(CfgEdgeKind::SwitchCase(value), id, target);
                    }
                    cfg.add_edge(CfgEdgeKind::SwitchDefault, id, *default_target);
                }
                Stmt::Return { .. } => {
                    cfg.add_edge(CfgEdgeKind::Return, id, ir.exit);
                }
                _ => {
                    cfg.add_edge(CfgEdgeKind::Fallthrough, id, next);
                }
            }
        }
        cfg
    }
}
