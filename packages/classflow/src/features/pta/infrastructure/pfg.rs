//! Pointer-flow graph
//!
//! Unlabeled inclusion edges between pointers: an edge s → t means
//! pt(s) ⊆ pt(t). Successor lists keep insertion order for deterministic
//! propagation.

use crate::features::pta::domain::PointerId;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Default)]
pub struct PointerFlowGraph {
    succs: FxHashMap<PointerId, Vec<PointerId>>,
    edge_set: FxHashSet<(PointerId, PointerId)>,
}

impl PointerFlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an inclusion edge, returning whether it was new.
    pub fn add_edge(&mut self, source: PointerId, target: PointerId) -> bool {
        if self.edge_set.insert((source, target)) {
            self.succs.entry(source).or_default().push(target);
            true
        } else {
            false
        }
    }

    pub fn succs_of(&self, pointer: PointerId) -> &[PointerId] {
        self.succs.get(&pointer).map_or(&[], Vec::as_slice)
    }

    pub fn edge_count(&self) -> usize {
        self.edge_set.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_deduplicated() {
        let mut pfg = PointerFlowGraph::new();
        assert!(pfg.add_edge(1, 2));
        assert!(!pfg.add_edge(1, 2));
        assert!(pfg.add_edge(2, 1));
        assert_eq!(pfg.edge_count(), 2);
        assert_eq!(pfg.succs_of(1), &[2]);
    }
}
