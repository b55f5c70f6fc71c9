//! Programmatic world construction
//!
//! The facade through which front ends (and every test) assemble a
//! program: declare classes, fields and methods, then attach bodies
//! statement by statement. Jump targets inside a body are local statement
//! indices; the builder rebases them to world-wide statement ids and
//! computes the per-variable access indexes when the body is sealed.

use crate::ir::hierarchy::{Class, ClassHierarchy, ClassId};
use crate::ir::method::{FieldData, FieldId, Method, MethodId, MethodIr, VarData, VarId};
use crate::ir::stmt::{
    BinaryOp, Condition, ConditionOp, Invoke, InvokeKind, MethodRef, SigId, Stmt, StmtId,
};
use crate::ir::types::Type;
use crate::ir::world::World;
use rustc_hash::FxHashMap;

#[derive(Default)]
pub struct WorldBuilder {
    hierarchy: ClassHierarchy,
    methods: Vec<Method>,
    vars: Vec<VarData>,
    stmts: Vec<Stmt>,
    stmt_method: Vec<MethodId>,
    fields: Vec<FieldData>,
    sigs: Vec<String>,
    sig_index: FxHashMap<String, SigId>,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a concrete class.
    pub fn add_class(&mut self, name: impl Into<String>, superclass: Option<ClassId>) -> ClassId {
        self.hierarchy.add_class(Class {
            name: name.into(),
            superclass,
            interfaces: Vec::new(),
            is_interface: false,
            declared: FxHashMap::default(),
        })
    }

    /// Declares a concrete class implementing the given interfaces.
    pub fn add_class_implementing(
        &mut self,
        name: impl Into<String>,
        superclass: Option<ClassId>,
        interfaces: &[ClassId],
    ) -> ClassId {
        self.hierarchy.add_class(Class {
            name: name.into(),
            superclass,
            interfaces: interfaces.to_vec(),
            is_interface: false,
            declared: FxHashMap::default(),
        })
    }

    /// Declares an interface extending the given super-interfaces.
    pub fn add_interface(
        &mut self,
        name: impl Into<String>,
        superinterfaces: &[ClassId],
    ) -> ClassId {
        self.hierarchy.add_class(Class {
            name: name.into(),
            superclass: None,
            interfaces: superinterfaces.to_vec(),
            is_interface: true,
            declared: FxHashMap::default(),
        })
    }

    pub fn add_field(&mut self, class: ClassId, name: impl Into<String>, ty: Type) -> FieldId {
        self.push_field(class, name, ty, false)
    }

    pub fn add_static_field(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        ty: Type,
    ) -> FieldId {
        self.push_field(class, name, ty, true)
    }

    fn push_field(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        ty: Type,
        is_static: bool,
    ) -> FieldId {
        let id = self.fields.len() as FieldId;
        self.fields.push(FieldData {
            name: name.into(),
            class,
            ty,
            is_static,
        });
        id
    }

    pub fn intern_sig(&mut self, subsignature: &str) -> SigId {
        if let Some(&id) = self.sig_index.get(subsignature) {
            return id;
        }
        let id = self.sigs.len() as SigId;
        self.sigs.push(subsignature.to_string());
        self.sig_index.insert(subsignature.to_string(), id);
        id
    }

    /// Declares a method without a body; attach one with [`set_body`].
    ///
    /// [`set_body`]: WorldBuilder::set_body
    pub fn add_method(
        &mut self,
        class: ClassId,
        subsignature: &str,
        is_static: bool,
    ) -> MethodId {
        self.push_method(class, subsignature, is_static, false)
    }

    pub fn add_abstract_method(&mut self, class: ClassId, subsignature: &str) -> MethodId {
        self.push_method(class, subsignature, false, true)
    }

    fn push_method(
        &mut self,
        class: ClassId,
        subsignature: &str,
        is_static: bool,
        is_abstract: bool,
    ) -> MethodId {
        let sig = self.intern_sig(subsignature);
        let id = self.methods.len() as MethodId;
        let name = subsignature
            .split('(')
            .next()
            .unwrap_or(subsignature)
            .to_string();
        self.methods.push(Method {
            name,
            class,
            sig,
            is_static,
            is_abstract,
            body: None,
        });
        self.hierarchy.class_mut(class).declared.insert(sig, id);
        id
    }

    /// Declares a static method and attaches its body in one step.
    pub fn add_static_method(
        &mut self,
        class: ClassId,
        subsignature: &str,
        build: impl FnOnce(&mut BodyBuilder),
    ) -> MethodId {
        let m = self.add_method(class, subsignature, true);
        self.set_body(m, build);
        m
    }

    /// Declares an instance method and attaches its body; the body gets a
    /// `this` variable typed to the declaring class.
    pub fn add_instance_method(
        &mut self,
        class: ClassId,
        subsignature: &str,
        build: impl FnOnce(&mut BodyBuilder),
    ) -> MethodId {
        let m = self.add_method(class, subsignature, false);
        self.set_body(m, build);
        m
    }

    /// Attaches a body to a declared method.
    pub fn set_body(&mut self, method: MethodId, build: impl FnOnce(&mut BodyBuilder)) {
        let is_static = self.methods[method as usize].is_static;
        let class = self.methods[method as usize].class;
        let mut body = BodyBuilder {
            method,
            this: None,
            params: Vec::new(),
            vars: Vec::new(),
            local_stmts: Vec::new(),
            w: self,
        };
        if !is_static {
            let this = body.var("this", Type::reference(class));
            body.this = Some(this);
        }
        build(&mut body);
        body.seal();
    }

    /// Seals the program. `main` becomes the entry method.
    pub fn finish(self, main: MethodId) -> World {
        assert!(
            self.methods[main as usize].body.is_some(),
            "entry method must have a body"
        );
        World {
            hierarchy: self.hierarchy,
            methods: self.methods,
            vars: self.vars,
            stmts: self.stmts,
            stmt_method: self.stmt_method,
            fields: self.fields,
            sigs: self.sigs,
            sig_index: self.sig_index,
            main_method: main,
            results: Default::default(),
        }
    }
}

/// Builds one method body. Statement-pushing methods return the local
/// index of the pushed statement, usable as a jump target.
pub struct BodyBuilder<'w> {
    w: &'w mut WorldBuilder,
    method: MethodId,
    this: Option<VarId>,
    params: Vec<VarId>,
    vars: Vec<VarId>,
    local_stmts: Vec<Stmt>,
}

impl BodyBuilder<'_> {
    /// Declares a local variable.
    pub fn var(&mut self, name: impl Into<String>, ty: Type) -> VarId {
        let id = self.w.vars.len() as VarId;
        self.w.vars.push(VarData::new(name, ty, self.method));
        self.vars.push(id);
        id
    }

    /// Declares an `int` local.
    pub fn int_var(&mut self, name: impl Into<String>) -> VarId {
        self.var(name, Type::int())
    }

    /// Declares a parameter; parameter order is declaration order.
    pub fn param(&mut self, name: impl Into<String>, ty: Type) -> VarId {
        let id = self.var(name, ty);
        self.params.push(id);
        id
    }

    /// The receiver variable. Panics in static methods.
    pub fn this(&self) -> VarId {
        self.this.expect("static method has no 'this'")
    }

    fn push(&mut self, stmt: Stmt) -> usize {
        self.local_stmts.push(stmt);
        self.local_stmts.len() - 1
    }

    /// `x = new C()`
    pub fn new_obj(&mut self, lhs: VarId, class: ClassId) -> usize {
        self.push(Stmt::New {
            lhs,
            ty: Type::reference(class),
        })
    }

    /// `x = new T[..]`
    pub fn new_array(&mut self, lhs: VarId, elem: Type) -> usize {
        self.push(Stmt::New {
            lhs,
            ty: Type::array_of(elem),
        })
    }

    /// `x = c`
    pub fn assign(&mut self, lhs: VarId, value: i32) -> usize {
        self.push(Stmt::AssignLiteral { lhs, value })
    }

    /// `x = y`
    pub fn copy(&mut self, lhs: VarId, rhs: VarId) -> usize {
        self.push(Stmt::Copy { lhs, rhs })
    }

    /// `x = (T) y`
    pub fn cast(&mut self, lhs: VarId, rhs: VarId, ty: Type) -> usize {
        self.push(Stmt::Cast { lhs, rhs, ty })
    }

    /// `x = y op z`
    pub fn binary(&mut self, lhs: VarId, op: BinaryOp, op1: VarId, op2: VarId) -> usize {
        self.push(Stmt::Binary { lhs, op, op1, op2 })
    }

    /// `x = o.f` / `x = T.f`
    pub fn load_field(&mut self, lhs: VarId, base: Option<VarId>, field: FieldId) -> usize {
        self.push(Stmt::LoadField { lhs, base, field })
    }

    /// `o.f = y` / `T.f = y`
    pub fn store_field(&mut self, base: Option<VarId>, field: FieldId, rhs: VarId) -> usize {
        self.push(Stmt::StoreField { base, field, rhs })
    }

    /// `x = a[i]`
    pub fn load_array(&mut self, lhs: VarId, base: VarId, index: VarId) -> usize {
        self.push(Stmt::LoadArray { lhs, base, index })
    }

    /// `a[i] = y`
    pub fn store_array(&mut self, base: VarId, index: VarId, rhs: VarId) -> usize {
        self.push(Stmt::StoreArray { base, index, rhs })
    }

    pub fn invoke(
        &mut self,
        kind: InvokeKind,
        result: Option<VarId>,
        base: Option<VarId>,
        class: ClassId,
        subsignature: &str,
        args: Vec<VarId>,
    ) -> usize {
        let sig = self.w.intern_sig(subsignature);
        self.push(Stmt::Invoke(Invoke {
            kind,
            result,
            base,
            method_ref: MethodRef { class, sig },
            args,
        }))
    }

    /// `r = C.m(args)`
    pub fn call_static(
        &mut self,
        result: Option<VarId>,
        class: ClassId,
        subsignature: &str,
        args: Vec<VarId>,
    ) -> usize {
        self.invoke(InvokeKind::Static, result, None, class, subsignature, args)
    }

    /// `r = base.m(args)` with virtual dispatch; the declared class is the
    /// static type of the receiver.
    pub fn call_virtual(
        &mut self,
        result: Option<VarId>,
        base: VarId,
        class: ClassId,
        subsignature: &str,
        args: Vec<VarId>,
    ) -> usize {
        self.invoke(
            InvokeKind::Virtual,
            result,
            Some(base),
            class,
            subsignature,
            args,
        )
    }

    /// `r = base.m(args)` through an interface reference.
    pub fn call_interface(
        &mut self,
        result: Option<VarId>,
        base: VarId,
        iface: ClassId,
        subsignature: &str,
        args: Vec<VarId>,
    ) -> usize {
        self.invoke(
            InvokeKind::Interface,
            result,
            Some(base),
            iface,
            subsignature,
            args,
        )
    }

    /// Non-virtual instance call (constructors, super calls).
    pub fn call_special(
        &mut self,
        result: Option<VarId>,
        base: VarId,
        class: ClassId,
        subsignature: &str,
        args: Vec<VarId>,
    ) -> usize {
        self.invoke(
            InvokeKind::Special,
            result,
            Some(base),
            class,
            subsignature,
            args,
        )
    }

    /// `if (op1 <op> op2) goto target` — `target` is a local index.
    pub fn if_goto(&mut self, op: ConditionOp, op1: VarId, op2: VarId, target: usize) -> usize {
        self.push(Stmt::If {
            cond: Condition { op, op1, op2 },
            target: target as StmtId,
        })
    }

    pub fn goto(&mut self, target: usize) -> usize {
        self.push(Stmt::Goto {
            target: target as StmtId,
        })
    }

    /// Lowered switch with explicit local case targets and a default.
    pub fn switch(&mut self, key: VarId, cases: Vec<(i32, usize)>, default_target: usize) -> usize {
        self.push(Stmt::Switch {
            key,
            cases: cases
                .into_iter()
                .map(|(v, t)| (v, t as StmtId))
                .collect(),
            default_target: default_target as StmtId,
        })
    }

    pub fn ret(&mut self, value: Option<VarId>) -> usize {
        self.push(Stmt::Return { value })
    }

    pub fn nop(&mut self) -> usize {
        self.push(Stmt::Nop)
    }

    /// Rebases jump targets, appends the synthetic entry/exit pair,
    /// computes the per-variable access indexes and attaches the body.
    fn seal(self) {
        let BodyBuilder {
            w,
            method,
            this,
            params,
            vars,
            mut local_stmts,
        } = self;

        let base = w.stmts.len() as StmtId;
        // entry Nop sits at `base`; real statements start at base + 1
        let rebase = |local: StmtId| base + 1 + local;
        for stmt in &mut local_stmts {
            match stmt {
                Stmt::If { target, .. } | Stmt::Goto { target } => *target = rebase(*target),
                Stmt::Switch {
                    cases,
                    default_target,
                    ..
                } => {
                    for (_, t) in cases.iter_mut() {
                        *t = rebase(*t);
                    }
                    *default_target = rebase(*default_target);
                }
                _ => {}
            }
        }

        let mut stmt_ids = Vec::with_capacity(local_stmts.len() + 2);
        let entry = base;
        w.stmts.push(Stmt::Nop);
        w.stmt_method.push(method);
        stmt_ids.push(entry);

        let mut return_vars = Vec::new();
        for stmt in local_stmts {
            let id = w.stmts.len() as StmtId;
            match &stmt {
                Stmt::StoreField {
                    base: Some(b), ..
                } => w.vars[*b as usize].store_fields.push(id),
                Stmt::LoadField {
                    base: Some(b), ..
                } => w.vars[*b as usize].load_fields.push(id),
                Stmt::StoreArray { base, .. } => w.vars[*base as usize].store_arrays.push(id),
                Stmt::LoadArray { base, .. } => w.vars[*base as usize].load_arrays.push(id),
                Stmt::Invoke(invoke) => {
                    if let Some(b) = invoke.base {
                        w.vars[b as usize].invokes.push(id);
                    }
                }
                Stmt::Return { value: Some(v) } => {
                    if !return_vars.contains(v) {
                        return_vars.push(*v);
                    }
                }
                _ => {}
            }
            w.stmts.push(stmt);
            w.stmt_method.push(method);
            stmt_ids.push(id);
        }

        let exit = w.stmts.len() as StmtId;
        w.stmts.push(Stmt::Nop);
        w.stmt_method.push(method);
        stmt_ids.push(exit);

        w.methods[method as usize].body = Some(MethodIr {
            stmts: stmt_ids,
            entry,
            exit,
            this,
            params,
            vars,
            return_vars,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_rebasing() {
        let mut b = WorldBuilder::new();
        let a = b.add_class("A", None);
        let main = b.add_static_method(a, "main()", |body| {
            let x = body.int_var("x");
            body.assign(x, 1); // local 0
            body.goto(3); // local 1, jumps over local 2
            body.assign(x, 2); // local 2
            body.ret(None); // local 3
        });
        let world = b.finish(main);
        let ir = world.method(main).ir();
        // entry nop + 4 statements + exit nop
        assert_eq!(ir.stmts.len(), 6);
        let goto_id = ir.stmts[2];
        match world.stmt(goto_id) {
            Stmt::Goto { target } => assert_eq!(*target, ir.stmts[4]),
            other => panic!("expected goto, got {other:?}"),
        }
    }

    #[test]
    fn test_access_indexes() {
        let mut b = WorldBuilder::new();
        let a = b.add_class("A", None);
        let f = b.add_field(a, "f", Type::int());
        let main = b.add_static_method(a, "main()", |body| {
            let o = body.var("o", Type::reference(a));
            let x = body.int_var("x");
            body.new_obj(o, a);
            body.store_field(Some(o), f, x);
            body.load_field(x, Some(o), f);
            body.ret(None);
        });
        let world = b.finish(main);
        let ir = world.method(main).ir();
        let o = ir.vars[0];
        assert_eq!(world.var(o).store_fields.len(), 1);
        assert_eq!(world.var(o).load_fields.len(), 1);
        assert!(world.var(o).invokes.is_empty());
    }

    #[test]
    fn test_return_vars_deduplicated() {
        let mut b = WorldBuilder::new();
        let a = b.add_class("A", None);
        let main = b.add_static_method(a, "main()", |body| {
            let x = body.int_var("x");
            let c = body.int_var("c");
            body.if_goto(ConditionOp::Eq, c, c, 2);
            body.ret(Some(x));
            body.ret(Some(x));
        });
        let world = b.finish(main);
        assert_eq!(world.method(main).ir().return_vars.len(), 1);
    }
}
