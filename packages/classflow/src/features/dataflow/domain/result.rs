//! Solver result storage
//!
//! IN/OUT facts per statement. Fields are public so solvers can borrow
//! the two maps independently.

use crate::ir::stmt::StmtId;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct DataflowResult<F> {
    pub in_facts: FxHashMap<StmtId, F>,
    pub out_facts: FxHashMap<StmtId, F>,
}

impl<F> Default for DataflowResult<F> {
    fn default() -> Self {
        Self {
            in_facts: FxHashMap::default(),
            out_facts: FxHashMap::default(),
        }
    }
}

impl<F> DataflowResult<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_fact(&self, node: StmtId) -> &F {
        &self.in_facts[&node]
    }

    pub fn out_fact(&self, node: StmtId) -> &F {
        &self.out_facts[&node]
    }

    pub fn set_in_fact(&mut self, node: StmtId, fact: F) {
        self.in_facts.insert(node, fact);
    }

    pub fn set_out_fact(&mut self, node: StmtId, fact: F) {
        self.out_facts.insert(node, fact);
    }
}
