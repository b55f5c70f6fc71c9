//! ICFG construction
//!
//! Stitches the per-method CFGs of every reachable method together along
//! the call graph: intra-procedural edges become normal edges, except
//! around call sites where they become call-to-return edges; each
//! resolved callee contributes a call edge into its entry and return
//! edges from its exit to every return site.

use crate::features::callgraph::domain::CallGraph;
use crate::features::cfg::infrastructure::CfgBuilder;
use crate::features::interproc::domain::{Icfg, IcfgEdge, IcfgEdgeKind};
use crate::ir::world::World;

pub struct IcfgBuilder;

impl IcfgBuilder {
    pub fn build(world: &World, call_graph: &CallGraph) -> Icfg {
        let mut icfg = Icfg::new();
        for &method in call_graph.entry_methods() {
            icfg.add_entry_method(method);
        }

        let cfgs: Vec<_> = call_graph
            .reachable_methods()
            .iter()
            .map(|&m| CfgBuilder::build(world, m))
            .collect();

        for cfg in &cfgs {
            icfg.add_method(cfg.method, cfg.entry(), cfg.exit(), cfg.nodes());
        }

        for cfg in &cfgs {
            for &node in cfg.nodes() {
                let is_call = world.stmt(node).is_call();
                for edge in cfg.out_edges_of(node) {
                    let kind = if is_call {
                        IcfgEdgeKind::CallToReturn
                    } else {
                        IcfgEdgeKind::Normal
                    };
                    icfg.add_edge(IcfgEdge {
                        kind,
                        source: node,
                        target: edge.target,
                    });
                }
                if is_call {
                    for &callee in call_graph.callees_of(node) {
                        let callee_ir = world.method(callee).ir();
                        icfg.add_edge(IcfgEdge {
                            kind: IcfgEdgeKind::Call { callee },
                            source: node,
                            target: callee_ir.entry,
                        });
                        for edge in cfg.out_edges_of(node) {
                            icfg.add_edge(IcfgEdge {
                                kind: IcfgEdgeKind::Return {
                                    call_site: node,
                                    callee,
                                    return_vars: callee_ir.return_vars.clone(),
                                },
                                source: callee_ir.exit,
                                target: edge.target,
                            });
                        }
                    }
                }
            }
        }
        icfg
    }
}
