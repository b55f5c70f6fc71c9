//! Methods, variables and fields
//!
//! Variables carry the precomputed inverted indexes the pointer analysis
//! walks when a receiver's points-to set grows: the instance field/array
//! accesses and invokes in which the variable is the base.

use crate::ir::hierarchy::ClassId;
use crate::ir::stmt::{SigId, StmtId};
use crate::ir::types::Type;

/// Variable identifier (index into the world variable arena)
pub type VarId = u32;

/// Method identifier (index into the world method arena)
pub type MethodId = u32;

/// Field identifier (index into the world field arena)
pub type FieldId = u32;

/// A named, typed location.
#[derive(Debug, Clone)]
pub struct VarData {
    pub name: String,
    pub ty: Type,
    pub method: MethodId,
    /// Instance `x.f = y` stores where this var is the base
    pub store_fields: Vec<StmtId>,
    /// Instance `y = x.f` loads where this var is the base
    pub load_fields: Vec<StmtId>,
    /// `x[i] = y` stores where this var is the array base
    pub store_arrays: Vec<StmtId>,
    /// `y = x[i]` loads where this var is the array base
    pub load_arrays: Vec<StmtId>,
    /// Instance invokes where this var is the receiver
    pub invokes: Vec<StmtId>,
}

impl VarData {
    pub fn new(name: impl Into<String>, ty: Type, method: MethodId) -> Self {
        Self {
            name: name.into(),
            ty,
            method,
            store_fields: Vec::new(),
            load_fields: Vec::new(),
            store_arrays: Vec::new(),
            load_arrays: Vec::new(),
            invokes: Vec::new(),
        }
    }

    pub fn can_hold_int(&self) -> bool {
        self.ty.can_hold_int()
    }
}

/// A field declaration.
#[derive(Debug, Clone)]
pub struct FieldData {
    pub name: String,
    pub class: ClassId,
    pub ty: Type,
    pub is_static: bool,
}

/// A method declaration, with an attached body unless abstract.
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub class: ClassId,
    pub sig: SigId,
    pub is_static: bool,
    pub is_abstract: bool,
    pub body: Option<MethodIr>,
}

impl Method {
    /// The attached body. Panics for abstract methods: the call-graph
    /// builders never make an abstract method reachable.
    pub fn ir(&self) -> &MethodIr {
        self.body
            .as_ref()
            .unwrap_or_else(|| panic!("method '{}' has no body", self.name))
    }
}

/// A method body: ordered statements plus variable roles.
///
/// `stmts[0]` is a synthetic entry `Nop` and the final element a synthetic
/// exit `Nop`; both exist so the CFG and ICFG have dedicated entry/exit
/// nodes per method.
#[derive(Debug, Clone)]
pub struct MethodIr {
    pub stmts: Vec<StmtId>,
    pub entry: StmtId,
    pub exit: StmtId,
    pub this: Option<VarId>,
    pub params: Vec<VarId>,
    /// All variables declared in the method (params and `this` included)
    pub vars: Vec<VarId>,
    /// Variables returned by `return v` statements
    pub return_vars: Vec<VarId>,
}

impl MethodIr {
    /// Real statements, synthetic entry/exit excluded.
    pub fn body_stmts(&self) -> &[StmtId] {
        &self.stmts[1..self.stmts.len() - 1]
    }
}
