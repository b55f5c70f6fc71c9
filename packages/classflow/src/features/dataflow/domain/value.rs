//! Constant-propagation lattice values
//!
//! `Undef ⊏ Const(c) ⊏ Nac`. Undef is the identity of the meet, Nac is
//! absorbing, and unequal constants collapse to Nac.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// No observed value (bottom)
    Undef,
    /// A single compile-time constant
    Const(i32),
    /// Not a constant (top)
    Nac,
}

impl Value {
    pub fn is_undef(&self) -> bool {
        matches!(self, Value::Undef)
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Value::Const(_))
    }

    pub fn is_nac(&self) -> bool {
        matches!(self, Value::Nac)
    }

    /// The constant, if this value is one.
    pub fn constant(&self) -> Option<i32> {
        match self {
            Value::Const(c) => Some(*c),
            _ => None,
        }
    }

    /// Lattice meet: commutative, associative, idempotent.
    pub fn meet(self, other: Value) -> Value {
        match (self, other) {
            (Value::Nac, _) | (_, Value::Nac) => Value::Nac,
            (Value::Undef, v) | (v, Value::Undef) => v,
            (Value::Const(a), Value::Const(b)) => {
                if a == b {
                    Value::Const(a)
                } else {
                    Value::Nac
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undef => write!(f, "UNDEF"),
            Value::Const(c) => write!(f, "{c}"),
            Value::Nac => write!(f, "NAC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_meet_table() {
        assert_eq!(Value::Undef.meet(Value::Const(3)), Value::Const(3));
        assert_eq!(Value::Const(3).meet(Value::Const(3)), Value::Const(3));
        assert_eq!(Value::Const(3).meet(Value::Const(4)), Value::Nac);
        assert_eq!(Value::Nac.meet(Value::Const(3)), Value::Nac);
        assert_eq!(Value::Undef.meet(Value::Undef), Value::Undef);
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Undef),
            Just(Value::Nac),
            any::<i32>().prop_map(Value::Const),
        ]
    }

    proptest! {
        #[test]
        fn prop_meet_commutative(a in arb_value(), b in arb_value()) {
            prop_assert_eq!(a.meet(b), b.meet(a));
        }

        #[test]
        fn prop_meet_associative(a in arb_value(), b in arb_value(), c in arb_value()) {
            prop_assert_eq!(a.meet(b).meet(c), a.meet(b.meet(c)));
        }

        #[test]
        fn prop_meet_idempotent(a in arb_value()) {
            prop_assert_eq!(a.meet(a), a);
        }

        #[test]
        fn prop_undef_identity_nac_absorbing(a in arb_value()) {
            prop_assert_eq!(Value::Undef.meet(a), a);
            prop_assert_eq!(Value::Nac.meet(a), Value::Nac);
        }
    }
}
