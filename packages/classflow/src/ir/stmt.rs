//! Statements and operators
//!
//! A tagged statement variant per IR operation. Statement identity is an
//! index into the world-wide statement arena; jump targets are statement
//! ids, resolved by the builder.

use crate::ir::hierarchy::ClassId;
use crate::ir::method::{FieldId, VarId};
use crate::ir::types::Type;
use serde::{Deserialize, Serialize};

/// Statement identifier (index into the world statement arena)
pub type StmtId = u32;

/// Interned method subsignature (name + parameter types)
pub type SigId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftOp {
    /// `<<`
    Shl,
    /// `>>` (arithmetic)
    Shr,
    /// `>>>` (logical)
    Ushr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitwiseOp {
    And,
    Or,
    Xor,
}

/// Binary operator families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Arithmetic(ArithmeticOp),
    Condition(ConditionOp),
    Shift(ShiftOp),
    Bitwise(BitwiseOp),
}

impl BinaryOp {
    /// Two's-complement 32-bit evaluation. Shift counts are masked to 31;
    /// condition operators yield 0 or 1. Callers must rule out division
    /// and remainder by zero beforehand.
    pub fn apply(&self, y: i32, z: i32) -> i32 {
        match self {
            BinaryOp::Arithmetic(op) => match op {
                ArithmeticOp::Add => y.wrapping_add(z),
                ArithmeticOp::Sub => y.wrapping_sub(z),
                ArithmeticOp::Mul => y.wrapping_mul(z),
                ArithmeticOp::Div => y.wrapping_div(z),
                ArithmeticOp::Rem => y.wrapping_rem(z),
            },
            BinaryOp::Condition(op) => {
                let holds = match op {
                    ConditionOp::Eq => y == z,
                    ConditionOp::Ne => y != z,
                    ConditionOp::Lt => y < z,
                    ConditionOp::Gt => y > z,
                    ConditionOp::Le => y <= z,
                    ConditionOp::Ge => y >= z,
                };
                holds as i32
            }
            BinaryOp::Shift(op) => {
                let shift = (z & 31) as u32;
                match op {
                    ShiftOp::Shl => y.wrapping_shl(shift),
                    ShiftOp::Shr => y.wrapping_shr(shift),
                    ShiftOp::Ushr => ((y as u32).wrapping_shr(shift)) as i32,
                }
            }
            BinaryOp::Bitwise(op) => match op {
                BitwiseOp::And => y & z,
                BitwiseOp::Or => y | z,
                BitwiseOp::Xor => y ^ z,
            },
        }
    }

    /// Division and remainder can raise at runtime.
    pub fn may_raise(&self) -> bool {
        matches!(
            self,
            BinaryOp::Arithmetic(ArithmeticOp::Div) | BinaryOp::Arithmetic(ArithmeticOp::Rem)
        )
    }
}

/// Branch condition `op1 <op> op2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub op: ConditionOp,
    pub op1: VarId,
    pub op2: VarId,
}

/// How a call site dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvokeKind {
    Static,
    Special,
    Virtual,
    Interface,
    Dynamic,
}

/// Unresolved target of a call site: declared class + subsignature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub class: ClassId,
    pub sig: SigId,
}

/// A call site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Invoke {
    pub kind: InvokeKind,
    /// Result variable of `r = f(...)`, if any
    pub result: Option<VarId>,
    /// Receiver variable for instance calls
    pub base: Option<VarId>,
    pub method_ref: MethodRef,
    pub args: Vec<VarId>,
}

impl Invoke {
    pub fn is_static(&self) -> bool {
        self.kind == InvokeKind::Static
    }
}

/// IR statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stmt {
    /// Synthetic entry/exit marker, also the identity transfer
    Nop,
    /// `x = new T()` — one abstract object per allocation site
    New { lhs: VarId, ty: Type },
    /// `x = c`
    AssignLiteral { lhs: VarId, value: i32 },
    /// `x = y`
    Copy { lhs: VarId, rhs: VarId },
    /// `x = (T) y`
    Cast { lhs: VarId, rhs: VarId, ty: Type },
    /// `x = y op z`
    Binary {
        lhs: VarId,
        op: BinaryOp,
        op1: VarId,
        op2: VarId,
    },
    /// `x = o.f` (instance, `base` present) or `x = T.f` (static)
    LoadField {
        lhs: VarId,
        base: Option<VarId>,
        field: FieldId,
    },
    /// `o.f = y` or `T.f = y`
    StoreField {
        base: Option<VarId>,
        field: FieldId,
        rhs: VarId,
    },
    /// `x = a[i]`
    LoadArray {
        lhs: VarId,
        base: VarId,
        index: VarId,
    },
    /// `a[i] = y`
    StoreArray {
        base: VarId,
        index: VarId,
        rhs: VarId,
    },
    Invoke(Invoke),
    /// Conditional jump; falls through on false
    If { cond: Condition, target: StmtId },
    Goto { target: StmtId },
    /// Lowered switch: explicit case targets plus a default
    Switch {
        key: VarId,
        cases: Vec<(i32, StmtId)>,
        default_target: StmtId,
    },
    Return { value: Option<VarId> },
}

impl Stmt {
    /// The variable this statement defines, if any.
    pub fn def(&self) -> Option<VarId> {
        match self {
            Stmt::New { lhs, .. }
            | Stmt::AssignLiteral { lhs, .. }
            | Stmt::Copy { lhs, .. }
            | Stmt::Cast { lhs, .. }
            | Stmt::Binary { lhs, .. }
            | Stmt::LoadField { lhs, .. }
            | Stmt::LoadArray { lhs, .. } => Some(*lhs),
            Stmt::Invoke(invoke) => invoke.result,
            _ => None,
        }
    }

    /// Variables this statement reads.
    pub fn uses(&self) -> Vec<VarId> {
        match self {
            Stmt::Copy { rhs, .. } | Stmt::Cast { rhs, .. } => vec![*rhs],
            Stmt::Binary { op1, op2, .. } => vec![*op1, *op2],
            Stmt::LoadField { base, .. } => base.iter().copied().collect(),
            Stmt::StoreField { base, rhs, .. } => {
                base.iter().copied().chain([*rhs]).collect()
            }
            Stmt::LoadArray { base, index, .. } => vec![*base, *index],
            Stmt::StoreArray { base, index, rhs } => vec![*base, *index, *rhs],
            Stmt::Invoke(invoke) => invoke
                .base
                .iter()
                .copied()
                .chain(invoke.args.iter().copied())
                .collect(),
            Stmt::If { cond, .. } => vec![cond.op1, cond.op2],
            Stmt::Switch { key, .. } => vec![*key],
            Stmt::Return { value } => value.iter().copied().collect(),
            _ => Vec::new(),
        }
    }

    pub fn as_invoke(&self) -> Option<&Invoke> {
        match self {
            Stmt::Invoke(invoke) => Some(invoke),
            _ => None,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Stmt::Invoke(_))
    }

    /// Whether an assignment with this statement's right-hand side can be
    /// removed when its target is not live. Allocation modifies the heap,
    /// casts and field/array accesses can raise, as can DIV and REM.
    pub fn rhs_has_no_side_effect(&self) -> bool {
        match self {
            Stmt::AssignLiteral { .. } | Stmt::Copy { .. } => true,
            Stmt::Binary { op, .. } => !op.may_raise(),
            Stmt::New { .. }
            | Stmt::Cast { .. }
            | Stmt::LoadField { .. }
            | Stmt::LoadArray { .. } => false,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_op_wrapping() {
        let add = BinaryOp::Arithmetic(ArithmeticOp::Add);
        assert_eq!(add.apply(i32::MAX, 1), i32::MIN);
        let mul = BinaryOp::Arithmetic(ArithmeticOp::Mul);
        assert_eq!(mul.apply(1 << 30, 4), 0);
    }

    #[test]
    fn test_shift_count_masked() {
        let shl = BinaryOp::Shift(ShiftOp::Shl);
        assert_eq!(shl.apply(1, 33), 2);
        let ushr = BinaryOp::Shift(ShiftOp::Ushr);
        assert_eq!(ushr.apply(-1, 28), 0xF);
        let shr = BinaryOp::Shift(ShiftOp::Shr);
        assert_eq!(shr.apply(-8, 1), -4);
    }

    #[test]
    fn test_condition_yields_bit() {
        let le = BinaryOp::Condition(ConditionOp::Le);
        assert_eq!(le.apply(1, 2), 1);
        assert_eq!(le.apply(3, 2), 0);
    }

    #[test]
    fn test_def_and_uses() {
        let s = Stmt::Binary {
            lhs: 0,
            op: BinaryOp::Arithmetic(ArithmeticOp::Add),
            op1: 1,
            op2: 2,
        };
        assert_eq!(s.def(), Some(0));
        assert_eq!(s.uses(), vec![1, 2]);

        let store = Stmt::StoreField {
            base: Some(3),
            field: 0,
            rhs: 4,
        };
        assert_eq!(store.def(), None);
        assert_eq!(store.uses(), vec![3, 4]);
    }

    #[test]
    fn test_side_effects() {
        assert!(Stmt::Copy { lhs: 0, rhs: 1 }.rhs_has_no_side_effect());
        assert!(!Stmt::Binary {
            lhs: 0,
            op: BinaryOp::Arithmetic(ArithmeticOp::Div),
            op1: 1,
            op2: 2,
        }
        .rhs_has_no_side_effect());
        assert!(!Stmt::New {
            lhs: 0,
            ty: Type::reference(0),
        }
        .rhs_has_no_side_effect());
    }
}
