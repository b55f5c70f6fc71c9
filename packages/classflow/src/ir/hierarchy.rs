//! Class hierarchy
//!
//! Superclass chains, interface links and method dispatch. The hierarchy
//! is immutable once the world is built; traversal primitives return
//! direct relations only and the call-graph builders own the closures.

use crate::ir::method::{Method, MethodId};
use crate::ir::stmt::SigId;
use rustc_hash::FxHashMap;

/// Class identifier (index into the hierarchy class arena)
pub type ClassId = u32;

/// A class or interface declaration.
#[derive(Debug, Clone)]
pub struct Class {
    pub name: String,
    pub superclass: Option<ClassId>,
    pub interfaces: Vec<ClassId>,
    pub is_interface: bool,
    /// Methods declared directly in this class, by subsignature
    pub declared: FxHashMap<SigId, MethodId>,
}

/// The class hierarchy with direct-relation indexes.
#[derive(Debug, Default)]
pub struct ClassHierarchy {
    classes: Vec<Class>,
    direct_subclasses: FxHashMap<ClassId, Vec<ClassId>>,
    direct_subinterfaces: FxHashMap<ClassId, Vec<ClassId>>,
    direct_implementors: FxHashMap<ClassId, Vec<ClassId>>,
}

impl ClassHierarchy {
    pub fn add_class(&mut self, class: Class) -> ClassId {
        let id = self.classes.len() as ClassId;
        if let Some(superclass) = class.superclass {
            if class.is_interface {
                self.direct_subinterfaces
                    .entry(superclass)
                    .or_default()
                    .push(id);
            } else {
                self.direct_subclasses
                    .entry(superclass)
                    .or_default()
                    .push(id);
            }
        }
        for &iface in &class.interfaces {
            if class.is_interface {
                self.direct_subinterfaces.entry(iface).or_default().push(id);
            } else {
                self.direct_implementors.entry(iface).or_default().push(id);
            }
        }
        self.classes.push(class);
        id
    }

    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id as usize]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id as usize]
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn direct_subclasses_of(&self, id: ClassId) -> &[ClassId] {
        self.direct_subclasses.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn direct_subinterfaces_of(&self, id: ClassId) -> &[ClassId] {
        self.direct_subinterfaces
            .get(&id)
            .map_or(&[], Vec::as_slice)
    }

    pub fn direct_implementors_of(&self, id: ClassId) -> &[ClassId] {
        self.direct_implementors.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Looks up the target method from the given class and subsignature,
    /// walking the superclass chain. Returns `None` when the top of the
    /// chain is reached without a match; the caller decides whether an
    /// abstract match counts.
    pub fn dispatch(&self, class: ClassId, sig: SigId) -> Option<MethodId> {
        let mut current = Some(class);
        while let Some(c) = current {
            let class = self.class(c);
            if let Some(&method) = class.declared.get(&sig) {
                return Some(method);
            }
            current = class.superclass;
        }
        None
    }

    /// Dispatch that skips abstract targets, the form every call-graph
    /// resolution uses.
    pub fn dispatch_concrete(&self, class: ClassId, sig: SigId, methods: &[Method]) -> Option<MethodId> {
        self.dispatch(class, sig)
            .filter(|&m| !methods[m as usize].is_abstract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::builder::WorldBuilder;

    #[test]
    fn test_dispatch_walks_superclass_chain() {
        let mut b = WorldBuilder::new();
        let a = b.add_class("A", None);
        let c = b.add_class("B", Some(a));
        let m = b.add_method(a, "foo()", false);
        b.set_body(m, |body| {
            body.ret(None);
        });
        let main = b.add_static_method(a, "main()", |body| {
            body.ret(None);
        });
        let world = b.finish(main);

        let sig = world.sig_id("foo()").unwrap();
        // B declares nothing: dispatch resolves through A
        assert_eq!(world.hierarchy.dispatch(c, sig), Some(m));
        assert_eq!(world.hierarchy.dispatch(a, sig), Some(m));
    }

    #[test]
    fn test_dispatch_missing_signature() {
        let mut b = WorldBuilder::new();
        let a = b.add_class("A", None);
        let main = b.add_static_method(a, "main()", |body| {
            body.ret(None);
        });
        let world = b.finish(main);
        assert_eq!(world.sig_id("bar()"), None);
    }
}
