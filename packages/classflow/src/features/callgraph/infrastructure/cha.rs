//! Class-hierarchy-analysis call-graph construction
//!
//! Resolution by declared types alone: static and special calls dispatch
//! through the declared class's superclass chain, virtual calls through
//! the subclass closure, interface calls through the sub-interface
//! closure and every implementor's subclass closure. Abstract targets are
//! skipped; an unresolved call adds no edge.

use crate::features::callgraph::domain::{CallEdge, CallGraph, CallKind};
use crate::ir::hierarchy::ClassId;
use crate::ir::method::MethodId;
use crate::ir::stmt::{Invoke, InvokeKind};
use crate::ir::world::World;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::debug;

pub struct ChaBuilder<'w> {
    world: &'w World,
}

impl<'w> ChaBuilder<'w> {
    pub const ID: &'static str = "cha";

    pub fn new(world: &'w World) -> Self {
        Self { world }
    }

    /// Builds the call graph reachable from the program entry.
    pub fn build(&self) -> CallGraph {
        let entry = self.world.main_method();
        let mut graph = CallGraph::new();
        graph.add_entry_method(entry);
        graph.add_reachable_method(entry);

        let mut work_list = VecDeque::new();
        work_list.push_back(entry);
        while let Some(method) = work_list.pop_front() {
            for call_site in CallGraph::call_sites_in(self.world, method) {
                let invoke = self
                    .world
                    .stmt(call_site)
                    .as_invoke()
                    .expect("call site must be an invoke");
                let kind = CallKind::from(invoke.kind);
                for callee in self.resolve(invoke) {
                    graph.add_edge(CallEdge {
                        kind,
                        call_site,
                        callee,
                    });
                    if graph.add_reachable_method(callee) {
                        work_list.push_back(callee);
                    }
                }
            }
        }
        debug!(
            reachable = graph.reachable_methods().len(),
            edges = graph.edges().len(),
            "CHA call graph built"
        );
        graph
    }

    /// Resolves the possible callees of a call site via the hierarchy.
    pub fn resolve(&self, invoke: &Invoke) -> Vec<MethodId> {
        let declared = invoke.method_ref.class;
        let sig = invoke.method_ref.sig;
        let mut callees = Vec::new();
        let mut seen = FxHashSet::default();

        match invoke.kind {
            InvokeKind::Static | InvokeKind::Special => {
                if let Some(m) = self.world.dispatch_concrete(declared, sig) {
                    callees.push(m);
                }
            }
            InvokeKind::Virtual | InvokeKind::Interface | InvokeKind::Dynamic => {
                let mut class_stack: Vec<ClassId> = Vec::new();
                let mut visited_classes = FxHashSet::default();
                if invoke.kind == InvokeKind::Interface {
                    // close over sub-interfaces, collect implementors
                    let mut iface_stack = vec![declared];
                    let mut visited_ifaces = FxHashSet::default();
                    visited_ifaces.insert(declared);
                    while let Some(iface) = iface_stack.pop() {
                        for &sub in self.world.hierarchy.direct_subinterfaces_of(iface) {
                            if visited_ifaces.insert(sub) {
                                iface_stack.push(sub);
                            }
                        }
                        for &imp in self.world.hierarchy.direct_implementors_of(iface) {
                            if visited_classes.insert(imp) {
                                class_stack.push(imp);
                            }
                        }
                    }
                } else {
                    visited_classes.insert(declared);
                    class_stack.push(declared);
                }
                while let Some(class) = class_stack.pop() {
                    if let Some(m) = self.world.dispatch_concrete(class, sig) {
                        if seen.insert(m) {
                            callees.push(m);
                        }
                    }
                    for &sub in self.world.hierarchy.direct_subclasses_of(class) {
                        if visited_classes.insert(sub) {
                            class_stack.push(sub);
                        }
                    }
                }
            }
        }
        callees
    }
}
