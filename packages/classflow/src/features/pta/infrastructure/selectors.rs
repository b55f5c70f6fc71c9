//! Context selectors
//!
//! The common k-limited abstractions over the shared interned context
//! representation:
//! - **call-site sensitivity**: the k most recent call sites
//! - **object sensitivity**: the receiver's allocation site, under its own
//!   heap context
//! - **type sensitivity**: the receiver's class instead of its site
//!
//! Heap contexts derive from the allocating method's context truncated to
//! k − 1 elements, so heap-context depth never exceeds method-context
//! depth.

use crate::config::ContextPolicy;
use crate::features::pta::domain::{
    ContextElem, ContextTable, CsCallSiteId, CsManager, CsMethodId, CsObjId, CtxId, HeapModel,
    ObjId,
};
use crate::features::pta::ports::ContextSelector;
use crate::ir::method::MethodId;

/// Selects the abstraction configured for this run.
pub fn selector_for(policy: ContextPolicy) -> Box<dyn ContextSelector> {
    match policy {
        ContextPolicy::Insensitive => Box::new(ContextInsensitive),
        ContextPolicy::CallSite(k) => Box::new(CallSiteSensitive { k }),
        ContextPolicy::Object(k) => Box::new(ObjectSensitive { k }),
        ContextPolicy::Type(k) => Box::new(TypeSensitive { k }),
    }
}

/// The context-insensitive baseline: every context is empty.
pub struct ContextInsensitive;

impl ContextSelector for ContextInsensitive {
    fn select_static_context(
        &self,
        ctxs: &mut ContextTable,
        _csm: &CsManager,
        _call_site: CsCallSiteId,
        _callee: MethodId,
    ) -> CtxId {
        ctxs.empty()
    }

    fn select_instance_context(
        &self,
        ctxs: &mut ContextTable,
        _csm: &CsManager,
        _heap: &HeapModel,
        _call_site: CsCallSiteId,
        _recv: CsObjId,
        _callee: MethodId,
    ) -> CtxId {
        ctxs.empty()
    }

    fn select_heap_context(
        &self,
        ctxs: &mut ContextTable,
        _csm: &CsManager,
        _method: CsMethodId,
        _obj: ObjId,
    ) -> CtxId {
        ctxs.empty()
    }
}

/// k-call-site sensitivity: callee context is the caller context extended
/// with the invoke, truncated to k.
pub struct CallSiteSensitive {
    pub k: usize,
}

impl ContextSelector for CallSiteSensitive {
    fn select_static_context(
        &self,
        ctxs: &mut ContextTable,
        csm: &CsManager,
        call_site: CsCallSiteId,
        _callee: MethodId,
    ) -> CtxId {
        let (ctx, invoke) = csm.cs_call_site(call_site);
        ctxs.append(ctx, ContextElem::CallSite(invoke), self.k)
    }

    fn select_instance_context(
        &self,
        ctxs: &mut ContextTable,
        csm: &CsManager,
        _heap: &HeapModel,
        call_site: CsCallSiteId,
        _recv: CsObjId,
        _callee: MethodId,
    ) -> CtxId {
        let (ctx, invoke) = csm.cs_call_site(call_site);
        ctxs.append(ctx, ContextElem::CallSite(invoke), self.k)
    }

    fn select_heap_context(
        &self,
        ctxs: &mut ContextTable,
        csm: &CsManager,
        method: CsMethodId,
        _obj: ObjId,
    ) -> CtxId {
        let (method_ctx, _) = csm.cs_method(method);
        ctxs.suffix(method_ctx, self.k - 1)
    }
}

/// k-object sensitivity: callee context is the receiver's heap context
/// extended with the receiver object. Static calls inherit the caller
/// context unchanged.
pub struct ObjectSensitive {
    pub k: usize,
}

impl ContextSelector for ObjectSensitive {
    fn select_static_context(
        &self,
        _ctxs: &mut ContextTable,
        csm: &CsManager,
        call_site: CsCallSiteId,
        _callee: MethodId,
    ) -> CtxId {
        csm.cs_call_site(call_site).0
    }

    fn select_instance_context(
        &self,
        ctxs: &mut ContextTable,
        csm: &CsManager,
        _heap: &HeapModel,
        _call_site: CsCallSiteId,
        recv: CsObjId,
        _callee: MethodId,
    ) -> CtxId {
        let (heap_ctx, obj) = csm.cs_obj(recv);
        ctxs.append(heap_ctx, ContextElem::Obj(obj), self.k)
    }

    fn select_heap_context(
        &self,
        ctxs: &mut ContextTable,
        csm: &CsManager,
        method: CsMethodId,
        _obj: ObjId,
    ) -> CtxId {
        let (method_ctx, _) = csm.cs_method(method);
        ctxs.suffix(method_ctx, self.k - 1)
    }
}

/// k-type sensitivity: like object sensitivity with the receiver's class
/// as the context element.
pub struct TypeSensitive {
    pub k: usize,
}

impl ContextSelector for TypeSensitive {
    fn select_static_context(
        &self,
        _ctxs: &mut ContextTable,
        csm: &CsManager,
        call_site: CsCallSiteId,
        _callee: MethodId,
    ) -> CtxId {
        csm.cs_call_site(call_site).0
    }

    fn select_instance_context(
        &self,
        ctxs: &mut ContextTable,
        csm: &CsManager,
        heap: &HeapModel,
        _call_site: CsCallSiteId,
        recv: CsObjId,
        _callee: MethodId,
    ) -> CtxId {
        let (heap_ctx, obj) = csm.cs_obj(recv);
        // arrays have no class: fall back to the allocation site
        let elem = match heap.obj(obj).ty.as_class() {
            Some(class) => ContextElem::Class(class),
            None => ContextElem::Obj(obj),
        };
        ctxs.append(heap_ctx, elem, self.k)
    }

    fn select_heap_context(
        &self,
        ctxs: &mut ContextTable,
        csm: &CsManager,
        method: CsMethodId,
        _obj: ObjId,
    ) -> CtxId {
        let (method_ctx, _) = csm.cs_method(method);
        ctxs.suffix(method_ctx, self.k - 1)
    }
}
