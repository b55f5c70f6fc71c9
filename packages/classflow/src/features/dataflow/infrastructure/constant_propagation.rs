//! Intra-procedural constant propagation
//!
//! Forward must-analysis over the integer constant lattice. Parameters
//! enter as NAC; `eval` computes two's-complement results when both
//! operands are constants, with a known zero divisor yielding NAC rather
//! than an abort.

use crate::features::cfg::domain::Cfg;
use crate::features::dataflow::domain::{CPFact, Value};
use crate::features::dataflow::ports::DataflowAnalysis;
use crate::ir::stmt::{BinaryOp, Condition, Stmt, StmtId};
use crate::ir::world::World;

pub struct ConstantPropagation<'w> {
    world: &'w World,
}

impl<'w> ConstantPropagation<'w> {
    pub const ID: &'static str = "constprop";

    pub fn new(world: &'w World) -> Self {
        Self { world }
    }

    /// Meets two values; exposed for the inter-procedural client.
    pub fn meet_value(&self, v1: Value, v2: Value) -> Value {
        v1.meet(v2)
    }

    /// Evaluates the right-hand side of a defining statement under `fact`.
    /// Anything the lattice cannot track (allocation, casts, heap reads,
    /// call results) is NAC.
    pub fn evaluate(&self, stmt: &Stmt, fact: &CPFact) -> Value {
        match stmt {
            Stmt::AssignLiteral { value, .. } => Value::Const(*value),
            Stmt::Copy { rhs, .. } => fact.get(*rhs),
            Stmt::Binary { op, op1, op2, .. } => Self::evaluate_binary(*op, fact.get(*op1), fact.get(*op2)),
            _ => Value::Nac,
        }
    }

    fn evaluate_binary(op: BinaryOp, y: Value, z: Value) -> Value {
        if let (Some(yc), Some(zc)) = (y.constant(), z.constant()) {
            if op.may_raise() && zc == 0 {
                return Value::Nac;
            }
            return Value::Const(op.apply(yc, zc));
        }
        if y.is_nac() || z.is_nac() {
            return Value::Nac;
        }
        Value::Undef
    }

    /// Evaluates a branch condition; used by the dead-code client.
    pub fn evaluate_condition(&self, cond: &Condition, fact: &CPFact) -> Value {
        Self::evaluate_binary(
            BinaryOp::Condition(cond.op),
            fact.get(cond.op1),
            fact.get(cond.op2),
        )
    }
}

impl DataflowAnalysis for ConstantPropagation<'_> {
    type Fact = CPFact;

    fn is_forward(&self) -> bool {
        true
    }

    fn new_boundary_fact(&self, cfg: &Cfg) -> CPFact {
        let mut fact = CPFact::new();
        let ir = self.world.method(cfg.method).ir();
        for &param in &ir.params {
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
        for (&var, &value) in fact.iter() {
            if self.world.can_hold_int(var) {
                let met = value.meet(target.get(var));
                target.update(var, met);
            }
        }
    }

    fn transfer_node(&self, stmt_id: StmtId, input: &CPFact, output: &mut CPFact) -> bool {
        let stmt = self.world.stmt(stmt_id);
        if let Some(lhs) = stmt.def() {
            let mut changed = false;
            // OUT = (IN \ {lhs}) ∪ gen
            for (&var, &value) in input.iter() {
                if var != lhs {
                    changed |= output.update(var, value);
                }
            }
            if self.world.can_hold_int(lhs) {
                changed |= output.update(lhs, self.evaluate(stmt, input));
            }
            changed
        } else {
            output.copy_from(input)
        }
    }
}
