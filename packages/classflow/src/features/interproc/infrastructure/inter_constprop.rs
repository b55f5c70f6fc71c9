//! Alias-aware inter-procedural constant propagation
//!
//! Extends the intra-procedural lattice with heap value flow resolved
//! through points-to information. At construction, four alias indexes are
//! built from the pointer-analysis result: static field accesses over all
//! reachable bodies, and per-variable instance field/array accesses merged
//! across every may-aliasing pair. Loads meet the values stored by all
//! aliased stores; stores whose OUT changed re-enqueue the dependent
//! loads.

use crate::features::dataflow::domain::{CPFact, DataflowResult, Value};
use crate::features::dataflow::infrastructure::ConstantPropagation;
use crate::features::dataflow::ports::DataflowAnalysis;
use crate::features::interproc::domain::{IcfgEdge, IcfgEdgeKind};
use crate::features::interproc::infrastructure::{IcfgBuilder, InterSolver};
use crate::features::interproc::ports::{InterDataflowAnalysis, InterSolverView};
use crate::features::pta::infrastructure::PointerAnalysisResult;
use crate::ir::method::{FieldId, MethodId, VarId};
use crate::ir::stmt::{Stmt, StmtId};
use crate::ir::world::World;
use rustc_hash::FxHashMap;

pub struct InterConstantPropagation<'w> {
    world: &'w World,
    cp: ConstantPropagation<'w>,
    store_static_fields: FxHashMap<FieldId, Vec<StmtId>>,
    load_static_fields: FxHashMap<FieldId, Vec<StmtId>>,
    store_instance_fields: FxHashMap<VarId, Vec<StmtId>>,
    load_instance_fields: FxHashMap<VarId, Vec<StmtId>>,
    store_arrays: FxHashMap<VarId, Vec<StmtId>>,
    load_arrays: FxHashMap<VarId, Vec<StmtId>>,
}

impl<'w> InterConstantPropagation<'w> {
    pub const ID: &'static str = "inter-constprop";

    /// Builds the ICFG from the pointer-analysis call graph and solves to
    /// a fixpoint.
    pub fn run(world: &World, pta: &PointerAnalysisResult) -> DataflowResult<CPFact> {
        let icfg = IcfgBuilder::build(world, pta.call_graph());
        let analysis = InterConstantPropagation::new(world, pta);
        InterSolver::new(&analysis, &icfg).solve()
    }

    pub fn new(world: &'w World, pta: &PointerAnalysisResult) -> Self {
        let mut analysis = Self {
            world,
            cp: ConstantPropagation::new(world),
            store_static_fields: FxHashMap::default(),
            load_static_fields: FxHashMap::default(),
            store_instance_fields: FxHashMap::default(),
            load_instance_fields: FxHashMap::default(),
            store_arrays: FxHashMap::default(),
            load_arrays: FxHashMap::default(),
        };
        analysis.build_indexes(pta);
        analysis
    }

    fn build_indexes(&mut self, pta: &PointerAnalysisResult) {
        for &method in pta.call_graph().reachable_methods() {
            for &stmt_id in self.world.method(method).ir().body_stmts() {
                match self.world.stmt(stmt_id) {
                    Stmt::StoreField {
                        base: None, field, ..
                    } => self
                        .store_static_fields
                        .entry(*field)
                        .or_default()
                        .push(stmt_id),
                    Stmt::LoadField {
                        base: None, field, ..
                    } => self
                        .load_static_fields
                        .entry(*field)
                        .or_default()
                        .push(stmt_id),
                    _ => {}
                }
            }
        }

        // merge the accesses of every may-aliasing variable into the base
        let vars = pta.get_vars();
        for &base in vars {
            for &var in vars {
                if !pta.may_alias(base, var) {
                    continue;
                }
                let var_data = self.world.var(var);
                self.store_instance_fields
                    .entry(base)
                    .or_default()
                    .extend(&var_data.store_fields);
                self.load_instance_fields
                    .entry(base)
                    .or_default()
                    .extend(&var_data.load_fields);
                self.store_arrays
                    .entry(base)
                    .or_default()
                    .extend(&var_data.store_arrays);
                self.load_arrays
                    .entry(base)
                    .or_default()
                    .extend(&var_data.load_arrays);
            }
        }
    }

    fn transfer_store_field(
        &self,
        base: Option<VarId>,
        field: FieldId,
        rhs: VarId,
        input: &CPFact,
        output: &mut CPFact,
        view: &mut InterSolverView<'_, CPFact>,
    ) -> bool {
        let changed = output.copy_from(input);
        if changed && self.world.can_hold_int(rhs) {
            match base {
                Some(base) => {
                    if let Some(loads) = self.load_instance_fields.get(&base) {
                        for &load in loads {
                            if let Stmt::LoadField {
                                field: load_field, ..
                            } = self.world.stmt(load)
                            {
                                if *load_field == field {
                                    view.work_list_add(load);
                                }
                            }
                        }
                    }
                }
                None => {
                    if let Some(loads) = self.load_static_fields.get(&field) {
                        for &load in loads {
                            view.work_list_add(load);
                        }
                    }
                }
            }
        }
        changed
    }

    fn transfer_load_field(
        &self,
        lhs: VarId,
        base: Option<VarId>,
        field: FieldId,
        input: &CPFact,
        output: &mut CPFact,
        view: &mut InterSolverView<'_, CPFact>,
    ) -> bool {
        if !self.world.can_hold_int(lhs) {
            return output.copy_from(input);
        }
        let mut in_copy = input.copy();
        let stores: Option<&Vec<StmtId>> = match base {
            Some(base) => self.store_instance_fields.get(&base),
            None => self.store_static_fields.get(&field),
        };
        let mut met: Option<Value> = None;
        if let Some(stores) = stores {
            for &store in stores {
                let Stmt::StoreField {
                    field: store_field,
                    rhs,
                    ..
                } = self.world.stmt(store)
                else {
                    continue;
                };
                if *store_field != field {
                    continue;
                }
                let stored = view.out_fact(store).get(*rhs);
                met = Some(match met {
                    None => stored,
                    Some(m) => m.meet(stored),
                });
            }
        }
        if let Some(value) = met {
            in_copy.update(lhs, value);
        }
        output.copy_from(&in_copy)
    }

    fn transfer_store_array(
        &self,
        base: VarId,
        rhs: VarId,
        input: &CPFact,
        output: &mut CPFact,
        view: &mut InterSolverView<'_, CPFact>,
    ) -> bool {
        let changed = output.copy_from(input);
        if changed && self.world.can_hold_int(rhs) {
            if let Some(loads) = self.load_arrays.get(&base) {
                for &load in loads {
                    view.work_list_add(load);
                }
            }
        }
        changed
    }

    fn transfer_load_array(
        &self,
        lhs: VarId,
        base: VarId,
        index: VarId,
        input: &CPFact,
        output: &mut CPFact,
        view: &mut InterSolverView<'_, CPFact>,
    ) -> bool {
        if !self.world.can_hold_int(lhs) {
            return output.copy_from(input);
        }
        let mut in_copy = input.copy();
        let mut met: Option<Value> = None;
        if let Some(stores) = self.store_arrays.get(&base) {
            for &store in stores {
                let Stmt::StoreArray {
                    index: store_index,
                    rhs,
                    ..
                } = self.world.stmt(store)
                else {
                    continue;
                };
                let load_index = input.get(index);
                let stored_index = view.out_fact(store).get(*store_index);
                if !Self::indices_may_equal(load_index, stored_index) {
                    continue;
                }
                let stored = view.out_fact(store).get(*rhs);
                met = Some(match met {
                    None => stored,
                    Some(m) => m.meet(stored),
                });
            }
        }
        if let Some(value) = met {
            in_copy.update(lhs, value);
        }
        output.copy_from(&in_copy)
    }

    /// Whether a load index may address the same element as a store
    /// index: never if either is UNDEF, equal constants only when both
    /// are constant, may-equal otherwise.
    fn indices_may_equal(a: Value, b: Value) -> bool {
        if a.is_undef() || b.is_undef() {
            return false;
        }
        match (a.constant(), b.constant()) {
            (Some(x), Some(y)) => x == y,
            _ => true,
        }
    }
}

impl InterDataflowAnalysis for InterConstantPropagation<'_> {
    type Fact = CPFact;

    fn new_boundary_fact(&self, method: MethodId) -> CPFact {
        let mut fact = CPFact::new();
        for &param in &self.world.method(method).ir().params {
            if self.world.can_hold_int(param) {
                fact.update(param, Value::Nac);
            }
        }
        fact
    }

    fn new_initial_fact(&self) -> CPFact {
        CPFact::new()
    }

    fn meet_into(&self, fact: &CPFact, target: &mut CPFact) {
        DataflowAnalysis::meet_into(&self.cp, fact, target);
    }

    fn transfer_node(
        &self,
        stmt_id: StmtId,
        input: &CPFact,
        output: &mut CPFact,
        view: &mut InterSolverView<'_, CPFact>,
    ) -> bool {
        match self.world.stmt(stmt_id) {
            // call nodes: identity; values flow along the call edges
            Stmt::Invoke(_) => output.copy_from(input),
            Stmt::StoreField { base, field, rhs } => {
                self.transfer_store_field(*base, *field, *rhs, input, output, view)
            }
            Stmt::LoadField { lhs, base, field } => {
                self.transfer_load_field(*lhs, *base, *field, input, output, view)
            }
            Stmt::StoreArray { base, rhs, .. } => {
                self.transfer_store_array(*base, *rhs, input, output, view)
            }
            Stmt::LoadArray { lhs, base, index } => {
                self.transfer_load_array(*lhs, *base, *index, input, output, view)
            }
            _ => DataflowAnalysis::transfer_node(&self.cp, stmt_id, input, output),
        }
    }

    fn transfer_edge(&self, edge: &IcfgEdge, out: &CPFact) -> CPFact {
        match &edge.kind {
            IcfgEdgeKind::Normal => out.copy(),
            IcfgEdgeKind::CallToReturn => {
                let mut fact = out.copy();
                if let Some(invoke) = self.world.stmt(edge.source).as_invoke() {
                    if let Some(result) = invoke.result {
                        fact.remove(result);
                    }
                }
                fact
            }
            IcfgEdgeKind::Call { callee } => {
                let mut fact = CPFact::new();
                let invoke = self
                    .world
                    .stmt(edge.source)
                    .as_invoke()
                    .expect("call edge source must be an invoke");
                let params = &self.world.method(*callee).ir().params;
                for (&arg, &param) in invoke.args.iter().zip(params.iter()) {
                    if self.world.can_hold_int(arg) {
                        fact.update(param, out.get(arg));
                    }
                }
                fact
            }
            IcfgEdgeKind::Return {
                call_site,
                return_vars,
                ..
            } => {
                let mut fact = CPFact::new();
                let invoke = self
                    .world
                    .stmt(*call_site)
                    .as_invoke()
                    .expect("return edge call site must be an invoke");
                if let Some(result) = invoke.result {
                    for &ret in return_vars {
                        let met = fact.get(result).meet(out.get(ret));
                        fact.update(result, met);
                    }
                }
                fact
            }
        }
    }
}
