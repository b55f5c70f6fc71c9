//! Pointer-analysis result
//!
//! An owned snapshot: the interned entity tables, the context-sensitive
//! call graph and its method-level projection, context-insensitive
//! points-to projections for alias queries, and any taint flows found.
//! Downstream analyses retrieve it from the world registry by id.

use crate::features::callgraph::domain::{CallEdge, CallGraph};
use crate::features::pta::domain::{
    ContextTable, CsManager, CtxId, HeapModel, ObjId, Pointer, PointsToSet,
};
use crate::features::pta::infrastructure::cs_call_graph::CsCallGraph;
use crate::features::pta::infrastructure::solver::PtaStats;
use crate::features::taint::domain::TaintFlow;
use crate::ir::method::VarId;
use rustc_hash::{FxHashMap, FxHashSet};

pub struct PointerAnalysisResult {
    ctxs: ContextTable,
    csm: CsManager,
    heap: HeapModel,
    cs_call_graph: CsCallGraph,
    call_graph: CallGraph,
    /// Context-insensitive projection: var → abstract objects
    ci_pts: FxHashMap<VarId, FxHashSet<ObjId>>,
    /// Pointer variables in discovery order
    vars: Vec<VarId>,
    taint_flows: Vec<TaintFlow>,
    stats: PtaStats,
}

impl PointerAnalysisResult {
    pub(crate) fn build(
        ctxs: ContextTable,
        csm: CsManager,
        heap: HeapModel,
        cs_call_graph: CsCallGraph,
        taint_flows: Vec<TaintFlow>,
        stats: PtaStats,
    ) -> Self {
        // method-level projection of the context-sensitive call graph
        let mut call_graph = CallGraph::new();
        for &cs_method in cs_call_graph.entry_methods() {
            call_graph.add_entry_method(csm.cs_method(cs_method).1);
        }
        for &cs_method in cs_call_graph.reachable_methods() {
            call_graph.add_reachable_method(csm.cs_method(cs_method).1);
        }
        for edge in cs_call_graph.edges() {
            call_graph.add_edge(CallEdge {
                kind: edge.kind,
                call_site: csm.cs_call_site(edge.call_site).1,
                callee: csm.cs_method(edge.callee).1,
            });
        }

        // context-insensitive points-to projection
        let mut ci_pts: FxHashMap<VarId, FxHashSet<ObjId>> = FxHashMap::default();
        let mut vars = Vec::new();
        for (pointer_id, pointer) in csm.pointers() {
            if let Pointer::CsVar { var, .. } = *pointer {
                let pts = csm.pts(pointer_id);
                if pts.is_empty() {
                    continue;
                }
                let objs = ci_pts.entry(var).or_insert_with(|| {
                    vars.push(var);
                    FxHashSet::default()
                });
                for cs_obj in pts.iter() {
                    objs.insert(csm.cs_obj(cs_obj).1);
                }
            }
        }
        Self {
            ctxs,
            csm,
            heap,
            cs_call_graph,
            call_graph,
            ci_pts,
            vars,
            taint_flows,
            stats,
        }
    }

    /// The method-level call graph projected from the context-sensitive
    /// one.
    pub fn call_graph(&self) -> &CallGraph {
        &self.call_graph
    }

    pub fn cs_call_graph(&self) -> &CsCallGraph {
        &self.cs_call_graph
    }

    /// The points-to set of a variable under a context, if that pointer
    /// was ever created.
    pub fn points_to_set(&self, ctx: CtxId, var: VarId) -> Option<&PointsToSet> {
        self.csm.find_cs_var(ctx, var).map(|p| self.csm.pts(p))
    }

    /// Variables that point to at least one object, in discovery order.
    pub fn get_vars(&self) -> &[VarId] {
        &self.vars
    }

    /// Context-insensitive points-to set of a variable.
    pub fn points_to_objs(&self, var: VarId) -> Option<&FxHashSet<ObjId>> {
        self.ci_pts.get(&var)
    }

    /// Whether two variables may point to a common object.
    pub fn may_alias(&self, a: VarId, b: VarId) -> bool {
        match (self.ci_pts.get(&a), self.ci_pts.get(&b)) {
            (Some(pa), Some(pb)) => {
                let (small, large) = if pa.len() <= pb.len() { (pa, pb) } else { (pb, pa) };
                small.iter().any(|o| large.contains(o))
            }
            _ => false,
        }
    }

    /// Taint flows, ascending by (source, sink, index); empty when taint
    /// analysis did not run.
    pub fn taint_flows(&self) -> &[TaintFlow] {
        &self.taint_flows
    }

    pub fn stats(&self) -> &PtaStats {
        &self.stats
    }

    pub fn contexts(&self) -> &ContextTable {
        &self.ctxs
    }

    pub fn cs_manager(&self) -> &CsManager {
        &self.csm
    }

    pub fn heap(&self) -> &HeapModel {
        &self.heap
    }
}
