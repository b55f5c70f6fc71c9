//! Abstract heap objects
//!
//! The allocation-site model: one abstract object per `New` statement,
//! typed by the allocation. Synthetic taint objects share the arena; they
//! are interned per (source call, declared type) so a re-typed taint keeps
//! the identity of its source.

use crate::ir::stmt::StmtId;
use crate::ir::types::Type;
use rustc_hash::FxHashMap;

/// Abstract object identifier
pub type ObjId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjKind {
    /// An allocation site
    Alloc { site: StmtId },
    /// A taint seed introduced at a source call
    Taint { source_call: StmtId },
}

#[derive(Debug, Clone)]
pub struct ObjData {
    pub kind: ObjKind,
    pub ty: Type,
}

/// Allocation-site heap model and object arena.
#[derive(Debug, Default)]
pub struct HeapModel {
    objs: Vec<ObjData>,
    alloc_index: FxHashMap<StmtId, ObjId>,
    taint_index: FxHashMap<(StmtId, Type), ObjId>,
}

impl HeapModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The abstract object of an allocation site; one per `New` statement.
    pub fn alloc_obj(&mut self, site: StmtId, ty: &Type) -> ObjId {
        if let Some(&id) = self.alloc_index.get(&site) {
            return id;
        }
        let id = self.objs.len() as ObjId;
        self.objs.push(ObjData {
            kind: ObjKind::Alloc { site },
            ty: ty.clone(),
        });
        self.alloc_index.insert(site, id);
        id
    }

    /// The taint object of a source call with a declared type. Interned:
    /// two taints are identical iff both components are equal.
    pub fn taint_obj(&mut self, source_call: StmtId, ty: &Type) -> ObjId {
        if let Some(&id) = self.taint_index.get(&(source_call, ty.clone())) {
            return id;
        }
        let id = self.objs.len() as ObjId;
        self.objs.push(ObjData {
            kind: ObjKind::Taint { source_call },
            ty: ty.clone(),
        });
        self.taint_index.insert((source_call, ty.clone()), id);
        id
    }

    pub fn obj(&self, id: ObjId) -> &ObjData {
        &self.objs[id as usize]
    }

    pub fn obj_count(&self) -> usize {
        self.objs.len()
    }

    pub fn is_taint(&self, id: ObjId) -> bool {
        matches!(self.obj(id).kind, ObjKind::Taint { .. })
    }

    /// The source call of a taint object.
    pub fn taint_source_call(&self, id: ObjId) -> Option<StmtId> {
        match self.obj(id).kind {
            ObjKind::Taint { source_call } => Some(source_call),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_obj_per_allocation_site() {
        let mut heap = HeapModel::new();
        let a = heap.alloc_obj(3, &Type::reference(0));
        let b = heap.alloc_obj(3, &Type::reference(0));
        let c = heap.alloc_obj(4, &Type::reference(0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_taint_interning_by_call_and_type() {
        let mut heap = HeapModel::new();
        let t1 = heap.taint_obj(7, &Type::reference(1));
        let t2 = heap.taint_obj(7, &Type::reference(1));
        let t3 = heap.taint_obj(7, &Type::reference(2));
        assert_eq!(t1, t2);
        assert_ne!(t1, t3);
        assert!(heap.is_taint(t1));
        assert_eq!(heap.taint_source_call(t3), Some(7));
    }
}
