//! The world facade
//!
//! Owns every arena (classes, methods, fields, variables, statements) and
//! the typed registry of named analysis results. Analyses read the world;
//! drivers store results into it under stable string ids.

use crate::errors::{ClassflowError, Result};
use crate::ir::hierarchy::ClassHierarchy;
use crate::ir::method::{FieldData, FieldId, Method, MethodId, VarData, VarId};
use crate::ir::stmt::{SigId, Stmt, StmtId};
use rustc_hash::FxHashMap;
use std::any::Any;

pub struct World {
    pub hierarchy: ClassHierarchy,
    pub(crate) methods: Vec<Method>,
    pub(crate) vars: Vec<VarData>,
    pub(crate) stmts: Vec<Stmt>,
    pub(crate) stmt_method: Vec<MethodId>,
    pub(crate) fields: Vec<FieldData>,
    pub(crate) sigs: Vec<String>,
    pub(crate) sig_index: FxHashMap<String, SigId>,
    pub(crate) main_method: MethodId,
    pub(crate) results: FxHashMap<String, Box<dyn Any>>,
}

impl World {
    /// The program entry method.
    pub fn main_method(&self) -> MethodId {
        self.main_method
    }

    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id as usize]
    }

    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &Method)> {
        self.methods
            .iter()
            .enumerate()
            .map(|(i, m)| (i as MethodId, m))
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn var(&self, id: VarId) -> &VarData {
        &self.vars[id as usize]
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id as usize]
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    /// The method whose body contains the given statement.
    pub fn containing_method(&self, stmt: StmtId) -> MethodId {
        self.stmt_method[stmt as usize]
    }

    pub fn field(&self, id: FieldId) -> &FieldData {
        &self.fields[id as usize]
    }

    /// The interned id of a subsignature, if any method declares it.
    pub fn sig_id(&self, subsignature: &str) -> Option<SigId> {
        self.sig_index.get(subsignature).copied()
    }

    pub fn sig_name(&self, sig: SigId) -> &str {
        &self.sigs[sig as usize]
    }

    /// Whether the variable's type is integer-shaped for the
    /// constant-propagation lattice.
    pub fn can_hold_int(&self, var: VarId) -> bool {
        self.var(var).can_hold_int()
    }

    /// Dispatch that skips abstract targets; `None` means the call is
    /// unresolvable and must be skipped.
    pub fn dispatch_concrete(&self, class: crate::ir::hierarchy::ClassId, sig: SigId) -> Option<MethodId> {
        self.hierarchy.dispatch_concrete(class, sig, &self.methods)
    }

    /// Resolves a call site's declared target along the hierarchy,
    /// abstract targets included. This is the resolution configured
    /// sources, sinks and transfers match against.
    pub fn resolve_method_ref(&self, method_ref: &crate::ir::stmt::MethodRef) -> Option<MethodId> {
        self.hierarchy.dispatch(method_ref.class, method_ref.sig)
    }

    /// Resolves a method by class name and subsignature, for configuration
    /// documents that reference methods textually.
    pub fn lookup_method(&self, class_name: &str, subsignature: &str) -> Option<MethodId> {
        let sig = self.sig_id(subsignature)?;
        (0..self.hierarchy.class_count() as u32)
            .find(|&c| self.hierarchy.class(c).name == class_name)
            .and_then(|c| self.hierarchy.class(c).declared.get(&sig).copied())
    }

    /// Stores an analysis result under a stable id, replacing any previous
    /// value.
    pub fn store_result<T: Any>(&mut self, id: impl Into<String>, value: T) {
        self.results.insert(id.into(), Box::new(value));
    }

    /// Retrieves a stored result, failing on a missing id or a type
    /// mismatch instead of panicking.
    pub fn result<T: Any>(&self, id: &str) -> Result<&T> {
        let boxed = self
            .results
            .get(id)
            .ok_or_else(|| ClassflowError::ResultMissing(id.to_string()))?;
        boxed
            .downcast_ref::<T>()
            .ok_or_else(|| ClassflowError::ResultType { id: id.to_string() })
    }

    pub fn has_result(&self, id: &str) -> bool {
        self.results.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::builder::WorldBuilder;

    fn tiny_world() -> World {
        let mut b = WorldBuilder::new();
        let a = b.add_class("A", None);
        let main = b.add_static_method(a, "main()", |body| {
            body.ret(None);
        });
        b.finish(main)
    }

    #[test]
    fn test_result_registry_roundtrip() {
        let mut world = tiny_world();
        world.store_result("answer", 42u64);
        assert_eq!(*world.result::<u64>("answer").unwrap(), 42);
    }

    #[test]
    fn test_result_registry_type_mismatch() {
        let mut world = tiny_world();
        world.store_result("answer", 42u64);
        assert!(matches!(
            world.result::<String>("answer"),
            Err(ClassflowError::ResultType { .. })
        ));
        assert!(matches!(
            world.result::<u64>("missing"),
            Err(ClassflowError::ResultMissing(_))
        ));
    }

    #[test]
    fn test_synthetic_entry_exit() {
        let world = tiny_world();
        let ir = world.method(world.main_method()).ir();
        assert!(matches!(world.stmt(ir.entry), Stmt::Nop));
        assert!(matches!(world.stmt(ir.exit), Stmt::Nop));
        assert_eq!(ir.body_stmts().len(), 1);
    }
}
