//! Contexts
//!
//! A context is an ordered, k-bounded sequence of context elements, interned
//! by value: equal element lists share one `CtxId`, so context equality is
//! id equality everywhere in the solver. Id 0 is the empty context.

use crate::features::pta::domain::heap::ObjId;
use crate::ir::hierarchy::ClassId;
use crate::ir::stmt::StmtId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Interned context identifier
pub type CtxId = u32;

/// One element of a context, drawn by the active selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextElem {
    /// A call site (invoke statement)
    CallSite(StmtId),
    /// An abstract heap object
    Obj(ObjId),
    /// A receiver class
    Class(ClassId),
}

/// Interning table for contexts.
#[derive(Debug)]
pub struct ContextTable {
    contexts: Vec<Vec<ContextElem>>,
    index: FxHashMap<Vec<ContextElem>, CtxId>,
}

impl Default for ContextTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextTable {
    pub fn new() -> Self {
        let mut table = Self {
            contexts: Vec::new(),
            index: FxHashMap::default(),
        };
        table.make(Vec::new());
        table
    }

    /// The distinguished empty context.
    pub fn empty(&self) -> CtxId {
        0
    }

    /// Interns an element list.
    pub fn make(&mut self, elems: Vec<ContextElem>) -> CtxId {
        if let Some(&id) = self.index.get(&elems) {
            return id;
        }
        let id = self.contexts.len() as CtxId;
        self.index.insert(elems.clone(), id);
        self.contexts.push(elems);
        id
    }

    /// Interns `base ++ [elem]`, truncated on the left to at most `k`
    /// elements.
    pub fn append(&mut self, base: CtxId, elem: ContextElem, k: usize) -> CtxId {
        if k == 0 {
            return self.empty();
        }
        let base_elems = &self.contexts[base as usize];
        let skip = (base_elems.len() + 1).saturating_sub(k);
        let mut elems: Vec<ContextElem> = base_elems.iter().skip(skip).copied().collect();
        elems.push(elem);
        self.make(elems)
    }

    /// Interns the suffix of `base` with at most `k` elements.
    pub fn suffix(&mut self, base: CtxId, k: usize) -> CtxId {
        let base_elems = &self.contexts[base as usize];
        if base_elems.len() <= k {
            return base;
        }
        let elems: Vec<ContextElem> = base_elems[base_elems.len() - k..].to_vec();
        self.make(elems)
    }

    pub fn elems(&self, ctx: CtxId) -> &[ContextElem] {
        &self.contexts[ctx as usize]
    }

    pub fn len(&self, ctx: CtxId) -> usize {
        self.contexts[ctx as usize].len()
    }

    pub fn is_empty(&self, ctx: CtxId) -> bool {
        self.contexts[ctx as usize].is_empty()
    }

    pub fn last(&self, ctx: CtxId) -> Option<ContextElem> {
        self.contexts[ctx as usize].last().copied()
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }
}
