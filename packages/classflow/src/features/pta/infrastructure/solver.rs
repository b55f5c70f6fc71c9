//! Context-sensitive Andersen-style solver
//!
//! Inclusion constraints over the pointer-flow graph, solved to a
//! fixpoint with an explicit FIFO worklist. Newly reachable methods are
//! scanned by a `match`-based statement processor that creates PFG
//! structure and seeds worklist entries; `propagate` unions deltas into
//! points-to sets and forwards only the delta to PFG successors. The
//! call graph grows on the fly; the taint plugin observes new call edges
//! and propagation deltas.
//!
//! Ordering invariants:
//! - a callee's `this` is seeded with the receiver before the call-graph
//!   edge is added, so a newly reachable method sees its receiver on
//!   first visit
//! - reachable-method bodies are scanned through an explicit queue, never
//!   through host recursion

use crate::config::AnalysisOptions;
use crate::errors::Result;
use crate::features::callgraph::domain::CallKind;
use crate::features::pta::domain::{
    ContextTable, CsCallSiteId, CsManager, CsMethodId, CsObjId, CtxId, HeapModel, Pointer,
    PointerId, PointsToSet,
};
use crate::features::pta::infrastructure::cs_call_graph::{CsCallEdge, CsCallGraph};
use crate::features::pta::infrastructure::pfg::PointerFlowGraph;
use crate::features::pta::infrastructure::result::PointerAnalysisResult;
use crate::features::pta::infrastructure::selectors::selector_for;
use crate::features::pta::infrastructure::worklist::WorkList;
use crate::features::pta::ports::ContextSelector;
use crate::features::taint::infrastructure::TaintAnalysis;
use crate::ir::hierarchy::ClassId;
use crate::ir::method::{MethodId, VarId};
use crate::ir::stmt::{Invoke, InvokeKind, Stmt, StmtId};
use crate::ir::world::World;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Fixpoint statistics
#[derive(Debug, Clone, Default)]
pub struct PtaStats {
    pub reachable_methods: usize,
    pub pointers: usize,
    pub pfg_edges: usize,
    pub call_edges: usize,
    pub contexts: usize,
    pub worklist_pops: usize,
    pub propagated_objects: usize,
}

pub struct Solver<'w> {
    pub(crate) world: &'w World,
    pub(crate) ctxs: ContextTable,
    pub(crate) csm: CsManager,
    pub(crate) heap: HeapModel,
    selector: Box<dyn ContextSelector>,
    pfg: PointerFlowGraph,
    pub(crate) work_list: WorkList,
    pub(crate) call_graph: CsCallGraph,
    reachable_queue: VecDeque<CsMethodId>,
    taint: Option<TaintAnalysis>,
    stats: PtaStats,
}

impl<'w> Solver<'w> {
    pub fn new(world: &'w World, options: &AnalysisOptions) -> Result<Self> {
        let taint = match &options.taint_config {
            Some(path) => Some(TaintAnalysis::from_file(path, world)?),
            None => None,
        };
        Ok(Self {
            world,
            ctxs: ContextTable::new(),
            csm: CsManager::new(),
            heap: HeapModel::new(),
            selector: selector_for(options.context_policy),
            pfg: PointerFlowGraph::new(),
            work_list: WorkList::new(),
            call_graph: CsCallGraph::new(),
            reachable_queue: VecDeque::new(),
            taint,
            stats: PtaStats::default(),
        })
    }

    pub fn solve(mut self) -> Result<PointerAnalysisResult> {
        self.initialize();
        self.analyze();
        self.finish()
    }

    fn initialize(&mut self) {
        let empty = self.ctxs.empty();
        let main = self.world.main_method();
        let cs_main = self.csm.get_cs_method(empty, main);
        self.call_graph.add_entry_method(cs_main);
        self.add_reachable(cs_main);
        debug!(method = main, "seeded entry method");
    }

    /// Marks a context-sensitive method reachable and queues its body for
    /// scanning. Idempotent.
    fn add_reachable(&mut self, cs_method: CsMethodId) {
        if self.call_graph.add_reachable_method(cs_method) {
            self.reachable_queue.push_back(cs_method);
        }
    }

    /// Scans the bodies of newly reachable methods.
    fn drain_reachable(&mut self) {
        while let Some(cs_method) = self.reachable_queue.pop_front() {
            let (ctx, method) = self.csm.cs_method(cs_method);
            let world = self.world;
            for &stmt_id in world.method(method).ir().body_stmts() {
                self.process_stmt(cs_method, ctx, stmt_id);
            }
        }
    }

    /// Creates PFG structure and worklist seeds for one statement of a
    /// newly reachable method. Does not traverse the PFG itself.
    fn process_stmt(&mut self, cs_method: CsMethodId, ctx: CtxId, stmt_id: StmtId) {
        let world = self.world;
        match world.stmt(stmt_id) {
            Stmt::New { lhs, ty } => {
                let obj = self.heap.alloc_obj(stmt_id, ty);
                let heap_ctx =
                    self.selector
                        .select_heap_context(&mut self.ctxs, &self.csm, cs_method, obj);
                let cs_obj = self.csm.get_cs_obj(heap_ctx, obj);
                let lhs_ptr = self.csm.get_cs_var(ctx, *lhs);
                self.work_list
                    .add_entry(lhs_ptr, PointsToSet::singleton(cs_obj));
            }
            Stmt::Copy { lhs, rhs } => {
                let source = self.csm.get_cs_var(ctx, *rhs);
                let target = self.csm.get_cs_var(ctx, *lhs);
                self.add_pfg_edge(source, target);
            }
            Stmt::LoadField {
                lhs,
                base: None,
                field,
            } => {
                let source = self.csm.get_static_field(*field);
                let target = self.csm.get_cs_var(ctx, *lhs);
                self.add_pfg_edge(source, target);
            }
            Stmt::StoreField {
                base: None,
                field,
                rhs,
            } => {
                let source = self.csm.get_cs_var(ctx, *rhs);
                let target = self.csm.get_static_field(*field);
                self.add_pfg_edge(source, target);
            }
            Stmt::Invoke(invoke) if invoke.is_static() => {
                self.process_static_call(ctx, stmt_id, invoke);
            }
            _ => {}
        }
    }

    fn process_static_call(&mut self, ctx: CtxId, stmt_id: StmtId, invoke: &Invoke) {
        let Some(callee) = self.resolve_callee(None, invoke) else {
            // unresolvable dispatch: skip silently
            return;
        };
        let cs_call_site = self.csm.get_cs_call_site(ctx, stmt_id);
        let callee_ctx =
            self.selector
                .select_static_context(&mut self.ctxs, &self.csm, cs_call_site, callee);
        let cs_callee = self.csm.get_cs_method(callee_ctx, callee);
        let edge = CsCallEdge {
            kind: CallKind::Static,
            call_site: cs_call_site,
            callee: cs_callee,
        };
        if self.call_graph.add_edge(edge) {
            self.add_reachable(cs_callee);
            self.bind_args_and_returns(ctx, invoke, callee_ctx, callee);
            self.notify_new_call_site(cs_call_site);
        }
    }

    /// Adds an inclusion edge; if new and the source already points
    /// somewhere, seeds the target.
    fn add_pfg_edge(&mut self, source: PointerId, target: PointerId) {
        if self.pfg.add_edge(source, target) {
            let pts = self.csm.pts(source);
            if !pts.is_empty() {
                let pts = pts.clone();
                self.work_list.add_entry(target, pts);
            }
        }
    }

    /// The main fixpoint loop.
    fn analyze(&mut self) {
        loop {
            self.drain_reachable();
            let Some((pointer, pts)) = self.work_list.poll() else {
                break;
            };
            self.stats.worklist_pops += 1;
            let delta = self.propagate(pointer, &pts);
            if delta.is_empty() {
                continue;
            }
            self.stats.propagated_objects += delta.len();
            if let Pointer::CsVar { ctx, var } = *self.csm.pointer(pointer) {
                self.notify_pointer_propagated(pointer, &delta);
                for cs_obj in delta.iter() {
                    self.process_accesses(ctx, var, cs_obj);
                    self.process_call(ctx, var, cs_obj);
                }
            }
        }
    }

    /// Unions `pts` into pt(pointer) and forwards the delta (only the
    /// newly added objects) to PFG successors. Returns the delta.
    fn propagate(&mut self, pointer: PointerId, pts: &PointsToSet) -> PointsToSet {
        let mut delta = PointsToSet::new();
        let target = self.csm.pts_mut(pointer);
        for obj in pts.iter() {
            if target.add(obj) {
                delta.add(obj);
            }
        }
        if !delta.is_empty() {
            for &succ in self.pfg.succs_of(pointer) {
                self.work_list.add_entry(succ, delta.clone());
            }
        }
        delta
    }

    /// Connects the instance field and array accesses of `var` to the
    /// newly discovered receiver object.
    fn process_accesses(&mut self, ctx: CtxId, var: VarId, cs_obj: CsObjId) {
        let world = self.world;
        let var_data = world.var(var);
        for &store_id in &var_data.store_fields {
            if let Stmt::StoreField { field, rhs, .. } = world.stmt(store_id) {
                let source = self.csm.get_cs_var(ctx, *rhs);
                let target = self.csm.get_instance_field(cs_obj, *field);
                self.add_pfg_edge(source, target);
            }
        }
        for &load_id in &var_data.load_fields {
            if let Stmt::LoadField { lhs, field, .. } = world.stmt(load_id) {
                let source = self.csm.get_instance_field(cs_obj, *field);
                let target = self.csm.get_cs_var(ctx, *lhs);
                self.add_pfg_edge(source, target);
            }
        }
        for &store_id in &var_data.store_arrays {
            if let Stmt::StoreArray { rhs, .. } = world.stmt(store_id) {
                let source = self.csm.get_cs_var(ctx, *rhs);
                let target = self.csm.get_array_index(cs_obj);
                self.add_pfg_edge(source, target);
            }
        }
        for &load_id in &var_data.load_arrays {
            if let Stmt::LoadArray { lhs, .. } = world.stmt(load_id) {
                let source = self.csm.get_array_index(cs_obj);
                let target = self.csm.get_cs_var(ctx, *lhs);
                self.add_pfg_edge(source, target);
            }
        }
    }

    /// Processes the instance calls on `var` against a newly discovered
    /// receiver object.
    fn process_call(&mut self, ctx: CtxId, var: VarId, recv: CsObjId) {
        let world = self.world;
        let (_, recv_obj) = self.csm.cs_obj(recv);
        let recv_class = self.heap.obj(recv_obj).ty.as_class();
        for &invoke_id in &world.var(var).invokes {
            let invoke = world
                .stmt(invoke_id)
                .as_invoke()
                .expect("invoke index must hold invokes");
            let Some(callee) = self.resolve_callee(recv_class, invoke) else {
                continue;
            };
            let cs_call_site = self.csm.get_cs_call_site(ctx, invoke_id);
            let callee_ctx = self.selector.select_instance_context(
                &mut self.ctxs,
                &self.csm,
                &self.heap,
                cs_call_site,
                recv,
                callee,
            );
            let cs_callee = self.csm.get_cs_method(callee_ctx, callee);
            // seed `this` before the edge so the callee sees its receiver
            // on first visit
            let callee_ir = world.method(callee).ir();
            if let Some(this) = callee_ir.this {
                let this_ptr = self.csm.get_cs_var(callee_ctx, this);
                self.work_list
                    .add_entry(this_ptr, PointsToSet::singleton(recv));
            }
            let edge = CsCallEdge {
                kind: CallKind::from(invoke.kind),
                call_site: cs_call_site,
                callee: cs_callee,
            };
            if self.call_graph.add_edge(edge) {
                self.add_reachable(cs_callee);
                self.bind_args_and_returns(ctx, invoke, callee_ctx, callee);
                self.notify_new_call_site(cs_call_site);
            }
        }
    }

    fn bind_args_and_returns(
        &mut self,
        caller_ctx: CtxId,
        invoke: &Invoke,
        callee_ctx: CtxId,
        callee: MethodId,
    ) {
        let callee_ir = self.world.method(callee).ir();
        debug_assert_eq!(invoke.args.len(), callee_ir.params.len());
        for (&arg, &param) in invoke.args.iter().zip(callee_ir.params.iter()) {
            let source = self.csm.get_cs_var(caller_ctx, arg);
            let target = self.csm.get_cs_var(callee_ctx, param);
            self.add_pfg_edge(source, target);
        }
        if let Some(result) = invoke.result {
            let result_ptr = self.csm.get_cs_var(caller_ctx, result);
            for &ret in &callee_ir.return_vars {
                let source = self.csm.get_cs_var(callee_ctx, ret);
                self.add_pfg_edge(source, result_ptr);
            }
        }
    }

    /// Dispatches a call site: static and special calls through the
    /// declared class, virtual and interface calls on the receiver class.
    fn resolve_callee(&self, recv_class: Option<ClassId>, invoke: &Invoke) -> Option<MethodId> {
        let sig = invoke.method_ref.sig;
        match invoke.kind {
            InvokeKind::Static | InvokeKind::Special => self
                .world
                .dispatch_concrete(invoke.method_ref.class, sig),
            _ => recv_class.and_then(|c| self.world.dispatch_concrete(c, sig)),
        }
    }

    fn notify_new_call_site(&mut self, cs_call_site: CsCallSiteId) {
        if let Some(mut taint) = self.taint.take() {
            taint.on_new_call_site(self, cs_call_site);
            self.taint = Some(taint);
        }
    }

    fn notify_pointer_propagated(&mut self, pointer: PointerId, delta: &PointsToSet) {
        if let Some(mut taint) = self.taint.take() {
            taint.on_pointer_propagated(self, pointer, delta);
            self.taint = Some(taint);
        }
    }

    fn finish(mut self) -> Result<PointerAnalysisResult> {
        self.stats.reachable_methods = self.call_graph.reachable_methods().len();
        self.stats.pointers = self.csm.pointer_count();
        self.stats.pfg_edges = self.pfg.edge_count();
        self.stats.call_edges = self.call_graph.edges().len();
        self.stats.contexts = self.ctxs.context_count();
        info!(
            reachable = self.stats.reachable_methods,
            pointers = self.stats.pointers,
            pfg_edges = self.stats.pfg_edges,
            pops = self.stats.worklist_pops,
            "pointer analysis converged"
        );
        let taint_flows = match &self.taint {
            Some(taint) => taint.collect_flows(&self),
            None => Vec::new(),
        };
        Ok(PointerAnalysisResult::build(
            self.ctxs,
            self.csm,
            self.heap,
            self.call_graph,
            taint_flows,
            self.stats,
        ))
    }
}
