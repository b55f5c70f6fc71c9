//! Typed class-based IR facade
//!
//! The analysis engines consume an already-built IR: statements, variables
//! with precomputed access indexes, methods, and a class hierarchy behind
//! the [`world::World`] facade. Construction from source or bytecode is a
//! front-end concern; programs are assembled through [`builder`], which is
//! also how tests build their inputs.

pub mod builder;
pub mod hierarchy;
pub mod method;
pub mod stmt;
pub mod types;
pub mod world;

pub use builder::WorldBuilder;
pub use hierarchy::{Class, ClassHierarchy, ClassId};
pub use method::{FieldData, FieldId, Method, MethodId, MethodIr, VarData, VarId};
pub use stmt::{
    ArithmeticOp, BinaryOp, BitwiseOp, Condition, ConditionOp, Invoke, InvokeKind, MethodRef,
    ShiftOp, SigId, Stmt, StmtId,
};
pub use types::{PrimitiveType, Type};
pub use world::World;
