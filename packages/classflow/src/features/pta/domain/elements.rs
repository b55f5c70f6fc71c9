//! Context-sensitive analysis entities
//!
//! All entities are interned by the manager: equal descriptors map to the
//! same id, so identity equality is descriptor equality. Pointer-kind
//! entities (variables, instance/static fields, array elements) carry the
//! points-to set attached at the same index.

use crate::features::pta::domain::context::CtxId;
use crate::features::pta::domain::heap::ObjId;
use crate::features::pta::domain::pts::PointsToSet;
use crate::ir::method::{FieldId, MethodId, VarId};
use crate::ir::stmt::StmtId;
use rustc_hash::FxHashMap;

/// Interned context-sensitive object: (heap context, object)
pub type CsObjId = u32;

/// Interned pointer (any pointer kind)
pub type PointerId = u32;

/// Interned context-sensitive call site: (context, invoke statement)
pub type CsCallSiteId = u32;

/// Interned context-sensitive method: (context, method)
pub type CsMethodId = u32;

/// A node of the pointer-flow graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pointer {
    /// A variable under a context
    CsVar { ctx: CtxId, var: VarId },
    /// A field of a context-sensitive object
    InstanceField { obj: CsObjId, field: FieldId },
    /// A static field (context-free)
    StaticField { field: FieldId },
    /// All elements of an abstract array, merged index-insensitively
    ArrayIndex { obj: CsObjId },
}

/// Interning manager for every context-sensitive entity.
#[derive(Debug, Default)]
pub struct CsManager {
    pointers: Vec<Pointer>,
    pts: Vec<PointsToSet>,
    cs_var_index: FxHashMap<(CtxId, VarId), PointerId>,
    instance_field_index: FxHashMap<(CsObjId, FieldId), PointerId>,
    static_field_index: FxHashMap<FieldId, PointerId>,
    array_index: FxHashMap<CsObjId, PointerId>,

    cs_objs: Vec<(CtxId, ObjId)>,
    cs_obj_index: FxHashMap<(CtxId, ObjId), CsObjId>,

    cs_call_sites: Vec<(CtxId, StmtId)>,
    cs_call_site_index: FxHashMap<(CtxId, StmtId), CsCallSiteId>,

    cs_methods: Vec<(CtxId, MethodId)>,
    cs_method_index: FxHashMap<(CtxId, MethodId), CsMethodId>,
}

impl CsManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern_pointer(&mut self, pointer: Pointer) -> PointerId {
        let id = self.pointers.len() as PointerId;
        self.pointers.push(pointer);
        self.pts.push(PointsToSet::new());
        id
    }

    pub fn get_cs_var(&mut self, ctx: CtxId, var: VarId) -> PointerId {
        if let Some(&id) = self.cs_var_index.get(&(ctx, var)) {
            return id;
        }
        let id = self.intern_pointer(Pointer::CsVar { ctx, var });
        self.cs_var_index.insert((ctx, var), id);
        id
    }

    pub fn get_instance_field(&mut self, obj: CsObjId, field: FieldId) -> PointerId {
        if let Some(&id) = self.instance_field_index.get(&(obj, field)) {
            return id;
        }
        let id = self.intern_pointer(Pointer::InstanceField { obj, field });
        self.instance_field_index.insert((obj, field), id);
        id
    }

    pub fn get_static_field(&mut self, field: FieldId) -> PointerId {
        if let Some(&id) = self.static_field_index.get(&field) {
            return id;
        }
        let id = self.intern_pointer(Pointer::StaticField { field });
        self.static_field_index.insert(field, id);
        id
    }

    pub fn get_array_index(&mut self, obj: CsObjId) -> PointerId {
        if let Some(&id) = self.array_index.get(&obj) {
            return id;
        }
        let id = self.intern_pointer(Pointer::ArrayIndex { obj });
        self.array_index.insert(obj, id);
        id
    }

    pub fn get_cs_obj(&mut self, heap_ctx: CtxId, obj: ObjId) -> CsObjId {
        if let Some(&id) = self.cs_obj_index.get(&(heap_ctx, obj)) {
            return id;
        }
        let id = self.cs_objs.len() as CsObjId;
        self.cs_objs.push((heap_ctx, obj));
        self.cs_obj_index.insert((heap_ctx, obj), id);
        id
    }

    pub fn get_cs_call_site(&mut self, ctx: CtxId, call_site: StmtId) -> CsCallSiteId {
        if let Some(&id) = self.cs_call_site_index.get(&(ctx, call_site)) {
            return id;
        }
        let id = self.cs_call_sites.len() as CsCallSiteId;
        self.cs_call_sites.push((ctx, call_site));
        self.cs_call_site_index.insert((ctx, call_site), id);
        id
    }

    pub fn get_cs_method(&mut self, ctx: CtxId, method: MethodId) -> CsMethodId {
        if let Some(&id) = self.cs_method_index.get(&(ctx, method)) {
            return id;
        }
        let id = self.cs_methods.len() as CsMethodId;
        self.cs_methods.push((ctx, method));
        self.cs_method_index.insert((ctx, method), id);
        id
    }

    /// Looks up an already-interned context-sensitive variable.
    pub fn find_cs_var(&self, ctx: CtxId, var: VarId) -> Option<PointerId> {
        self.cs_var_index.get(&(ctx, var)).copied()
    }

    pub fn pointer(&self, id: PointerId) -> &Pointer {
        &self.pointers[id as usize]
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn pts(&self, pointer: PointerId) -> &PointsToSet {
        &self.pts[pointer as usize]
    }

    pub fn pts_mut(&mut self, pointer: PointerId) -> &mut PointsToSet {
        &mut self.pts[pointer as usize]
    }

    /// The (heap context, object) pair behind a context-sensitive object.
    pub fn cs_obj(&self, id: CsObjId) -> (CtxId, ObjId) {
        self.cs_objs[id as usize]
    }

    pub fn cs_obj_count(&self) -> usize {
        self.cs_objs.len()
    }

    /// The (context, invoke statement) pair behind a call site.
    pub fn cs_call_site(&self, id: CsCallSiteId) -> (CtxId, StmtId) {
        self.cs_call_sites[id as usize]
    }

    /// The (context, method) pair behind a context-sensitive method.
    pub fn cs_method(&self, id: CsMethodId) -> (CtxId, MethodId) {
        self.cs_methods[id as usize]
    }

    /// Every interned pointer with its id, in interning order.
    pub fn pointers(&self) -> impl Iterator<Item = (PointerId, &Pointer)> {
        self.pointers
            .iter()
            .enumerate()
            .map(|(i, p)| (i as PointerId, p))
    }
}
