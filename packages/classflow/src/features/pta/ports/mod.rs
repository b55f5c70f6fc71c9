//! Context-selection seam
//!
//! The solver is parametric in the context abstraction: selectors decide
//! the callee context at each resolved call and the heap context at each
//! allocation. All selectors produce interned, k-bounded contexts.

use crate::features::pta::domain::{
    ContextTable, CsCallSiteId, CsManager, CsMethodId, CsObjId, CtxId, HeapModel, ObjId,
};
use crate::ir::method::MethodId;

pub trait ContextSelector {
    /// The context of entry methods.
    fn empty_context(&self, ctxs: &ContextTable) -> CtxId {
        ctxs.empty()
    }

    /// Callee context for a static (receiverless) call.
    fn select_static_context(
        &self,
        ctxs: &mut ContextTable,
        csm: &CsManager,
        call_site: CsCallSiteId,
        callee: MethodId,
    ) -> CtxId;

    /// Callee context for an instance call on a receiver object.
    fn select_instance_context(
        &self,
        ctxs: &mut ContextTable,
        csm: &CsManager,
        heap: &HeapModel,
        call_site: CsCallSiteId,
        recv: CsObjId,
        callee: MethodId,
    ) -> CtxId;

    /// Heap context for an object allocated in a context-sensitive method.
    fn select_heap_context(
        &self,
        ctxs: &mut ContextTable,
        csm: &CsManager,
        method: CsMethodId,
        obj: ObjId,
    ) -> CtxId;
}
