//! Taint plugin
//!
//! Observes the pointer-analysis solver through three hooks:
//! - a new call-graph edge checks the declared callee against configured
//!   sources (seed the result variable with an interned taint object),
//!   sinks (record the call) and transfers (add a transfer edge between
//!   the endpoint variables and forward already-present taints)
//! - a propagation delta forwards re-typed taints along transfer edges;
//!   only the delta is observed, so taints never re-propagate
//! - at the end of the solve, sink arguments' points-to sets are read and
//!   one flow is emitted per tainted object, ordered ascending
//!
//! Re-typing preserves the source call and replaces the declared type
//! with the target variable's type; interning keeps taint identity.

use crate::errors::Result;
use crate::features::pta::domain::{CsCallSiteId, CtxId, Pointer, PointerId, PointsToSet};
use crate::features::pta::infrastructure::Solver;
use crate::features::taint::domain::{Sink, TaintConfig, TaintFlow, ARG_BASE, ARG_RESULT};
use crate::ir::stmt::Invoke;
use crate::ir::world::World;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use tracing::{debug, info};

pub struct TaintAnalysis {
    config: TaintConfig,
    /// Sink call sites discovered so far, in discovery order
    sink_calls: Vec<(Sink, CsCallSiteId)>,
    sink_call_set: FxHashSet<(Sink, CsCallSiteId)>,
    /// Taint-transfer edges between pointer variables
    transfer_edges: FxHashMap<PointerId, Vec<PointerId>>,
    transfer_edge_set: FxHashSet<(PointerId, PointerId)>,
}

impl TaintAnalysis {
    pub const ID: &'static str = "taint";

    pub fn from_file(path: &Path, world: &World) -> Result<Self> {
        let config = TaintConfig::from_file(path, world)?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: TaintConfig) -> Self {
        Self {
            config,
            sink_calls: Vec::new(),
            sink_call_set: FxHashSet::default(),
            transfer_edges: FxHashMap::default(),
            transfer_edge_set: FxHashSet::default(),
        }
    }

    /// Hook: a new call-graph edge appeared for this call site.
    pub fn on_new_call_site(&mut self, solver: &mut Solver, cs_call_site: CsCallSiteId) {
        let (ctx, stmt_id) = solver.csm.cs_call_site(cs_call_site);
        let invoke = solver
            .world
            .stmt(stmt_id)
            .as_invoke()
            .expect("call site must be an invoke");
        let Some(method) = solver.world.resolve_method_ref(&invoke.method_ref) else {
            return;
        };

        if let Some(ty) = self.config.sources.get(&method) {
            if let Some(result) = invoke.result {
                let taint = solver.heap.taint_obj(stmt_id, ty);
                let empty = solver.ctxs.empty();
                let cs_taint = solver.csm.get_cs_obj(empty, taint);
                let result_ptr = solver.csm.get_cs_var(ctx, result);
                solver
                    .work_list
                    .add_entry(result_ptr, PointsToSet::singleton(cs_taint));
                debug!(call = stmt_id, "seeded taint source");
            }
        }

        if let Some(sinks) = self.config.sinks.get(&method) {
            for &sink in sinks {
                if self.sink_call_set.insert((sink, cs_call_site)) {
                    self.sink_calls.push((sink, cs_call_site));
                }
            }
        }

        if let Some(transfers) = self.config.transfers.get(&method).cloned() {
            for transfer in transfers {
                let Some(from) = Self::endpoint_var(solver, ctx, invoke, transfer.from) else {
                    continue;
                };
                let Some(to) = Self::endpoint_var(solver, ctx, invoke, transfer.to) else {
                    continue;
                };
                if self.transfer_edge_set.insert((from, to)) {
                    self.transfer_edges.entry(from).or_default().push(to);
                    let from_pts = solver.csm.pts(from).clone();
                    Self::transfer_taints(solver, &from_pts, to);
                }
            }
        }
    }

    /// Hook: `pointer` gained the objects in `delta`.
    pub fn on_pointer_propagated(
        &mut self,
        solver: &mut Solver,
        pointer: PointerId,
        delta: &PointsToSet,
    ) {
        let Some(targets) = self.transfer_edges.get(&pointer).cloned() else {
            return;
        };
        for to in targets {
            Self::transfer_taints(solver, delta, to);
        }
    }

    /// Seeds `to` with the taints of `from_pts`, re-typed to `to`'s
    /// declared variable type.
    fn transfer_taints(solver: &mut Solver, from_pts: &PointsToSet, to: PointerId) {
        let Pointer::CsVar { var: to_var, .. } = *solver.csm.pointer(to) else {
            return;
        };
        let to_ty = solver.world.var(to_var).ty.clone();
        let empty = solver.ctxs.empty();
        let mut seeded = PointsToSet::new();
        for cs_obj in from_pts.iter() {
            let (_, obj) = solver.csm.cs_obj(cs_obj);
            if let Some(source_call) = solver.heap.taint_source_call(obj) {
                let retyped = solver.heap.taint_obj(source_call, &to_ty);
                let cs_retyped = solver.csm.get_cs_obj(empty, retyped);
                seeded.add(cs_retyped);
            }
        }
        if !seeded.is_empty() {
            solver.work_list.add_entry(to, seeded);
        }
    }

    fn endpoint_var(
        solver: &mut Solver,
        ctx: CtxId,
        invoke: &Invoke,
        endpoint: i32,
    ) -> Option<PointerId> {
        let var = match endpoint {
            ARG_RESULT => invoke.result,
            ARG_BASE => invoke.base,
            i => invoke.args.get(i as usize).copied(),
        }?;
        Some(solver.csm.get_cs_var(ctx, var))
    }

    /// Hook: the solve finished; collect flows from sink arguments.
    pub fn collect_flows(&self, solver: &Solver) -> Vec<TaintFlow> {
        let mut flows = FxHashSet::default();
        for &(sink, cs_call_site) in &self.sink_calls {
            let (ctx, stmt_id) = solver.csm.cs_call_site(cs_call_site);
            let invoke = solver
                .world
                .stmt(stmt_id)
                .as_invoke()
                .expect("sink call must be an invoke");
            let Some(&arg) = invoke.args.get(sink.index) else {
                continue;
            };
            let Some(arg_ptr) = solver.csm.find_cs_var(ctx, arg) else {
                continue;
            };
            for cs_obj in solver.csm.pts(arg_ptr).iter() {
                let (_, obj) = solver.csm.cs_obj(cs_obj);
                if let Some(source_call) = solver.heap.taint_source_call(obj) {
                    flows.insert(TaintFlow {
                        source_call,
                        sink_call: stmt_id,
                        index: sink.index,
                    });
                }
            }
        }
        let mut flows: Vec<_> = flows.into_iter().collect();
        flows.sort_unstable();
        info!(flows = flows.len(), "taint flows collected");
        flows
    }
}
