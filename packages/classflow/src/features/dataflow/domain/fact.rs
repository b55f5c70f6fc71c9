//! Data-flow facts
//!
//! `CPFact` maps variables to lattice values with absent keys read as
//! UNDEF; `SetFact` is the may-set fact used by live variables.

use crate::features::dataflow::domain::value::Value;
use crate::ir::method::VarId;
use rustc_hash::{FxHashMap, FxHashSet};

/// A constant-propagation fact: Var → Value, absent = UNDEF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CPFact {
    map: FxHashMap<VarId, Value>,
}

impl CPFact {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of a variable; UNDEF when unmapped.
    pub fn get(&self, var: VarId) -> Value {
        self.map.get(&var).copied().unwrap_or(Value::Undef)
    }

    /// Maps `var` to `value`, returning whether the fact changed.
    /// Storing UNDEF for an unmapped variable is a no-op.
    pub fn update(&mut self, var: VarId, value: Value) -> bool {
        if value.is_undef() {
            return self.map.remove(&var).is_some();
        }
        self.map.insert(var, value) != Some(value)
    }

    pub fn remove(&mut self, var: VarId) -> Option<Value> {
        self.map.remove(&var)
    }

    pub fn copy(&self) -> CPFact {
        self.clone()
    }

    /// Copies every mapping of `other` into this fact, returning whether
    /// anything changed.
    pub fn copy_from(&mut self, other: &CPFact) -> bool {
        let mut changed = false;
        for (&var, &value) in other.iter() {
            changed |= self.update(var, value);
        }
        changed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VarId, &Value)> {
        self.map.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = VarId> + '_ {
        self.map.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// A set fact over variables (live variables).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetFact {
    set: FxHashSet<VarId>,
}

impl SetFact {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, var: VarId) -> bool {
        self.set.contains(&var)
    }

    pub fn add(&mut self, var: VarId) -> bool {
        self.set.insert(var)
    }

    pub fn remove(&mut self, var: VarId) -> bool {
        self.set.remove(&var)
    }

    /// Unions `other` into this set, returning whether it grew.
    pub fn union(&mut self, other: &SetFact) -> bool {
        let before = self.set.len();
        self.set.extend(other.set.iter().copied());
        self.set.len() > before
    }

    pub fn iter(&self) -> impl Iterator<Item = VarId> + '_ {
        self.set.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_reads_undef() {
        let fact = CPFact::new();
        assert_eq!(fact.get(7), Value::Undef);
    }

    #[test]
    fn test_update_reports_change() {
        let mut fact = CPFact::new();
        assert!(fact.update(0, Value::Const(1)));
        assert!(!fact.update(0, Value::Const(1)));
        assert!(fact.update(0, Value::Nac));
        // writing UNDEF clears the mapping
        assert!(fact.update(0, Value::Undef));
        assert!(!fact.update(0, Value::Undef));
    }

    #[test]
    fn test_copy_from_unions() {
        let mut a = CPFact::new();
        a.update(0, Value::Const(1));
        let mut b = CPFact::new();
        b.update(1, Value::Const(2));
        assert!(a.copy_from(&b));
        assert_eq!(a.get(0), Value::Const(1));
        assert_eq!(a.get(1), Value::Const(2));
        assert!(!a.copy_from(&b));
    }

    #[test]
    fn test_set_fact_union() {
        let mut a = SetFact::new();
        a.add(1);
        let mut b = SetFact::new();
        b.add(1);
        b.add(2);
        assert!(a.union(&b));
        assert!(!a.union(&b));
        assert_eq!(a.len(), 2);
    }
}
