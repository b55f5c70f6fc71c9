mod context;
mod elements;
mod heap;
mod pts;

pub use context::{ContextElem, ContextTable, CtxId};
pub use elements::{CsCallSiteId, CsManager, CsMethodId, CsObjId, Pointer, PointerId};
pub use heap::{HeapModel, ObjData, ObjId, ObjKind};
pub use pts::PointsToSet;
