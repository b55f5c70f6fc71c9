//! Pointer-analysis integration scenarios: heap flow, call binding,
//! on-the-fly call-graph construction and context-sensitivity precision.

use classflow::config::AnalysisOptions;
use classflow::features::pta::PointerAnalysis;
use classflow::ir::builder::WorldBuilder;
use classflow::ir::method::VarId;
use classflow::ir::types::Type;
use classflow::ir::world::World;

fn run_with(world: &World, policy: &str) -> classflow::features::pta::PointerAnalysisResult {
    let options = AnalysisOptions::new().with_context_policy(policy).unwrap();
    PointerAnalysis::run(world, &options).unwrap()
}

fn obj_count(result: &classflow::features::pta::PointerAnalysisResult, var: VarId) -> usize {
    result.points_to_objs(var).map_or(0, |s| s.len())
}

#[test]
fn test_new_and_copy_flow() {
    let mut b = WorldBuilder::new();
    let a = b.add_class("A", None);
    let mut vars = (0, 0);
    let main = b.add_static_method(a, "main()", |body| {
        let x = body.var("x", Type::reference(a));
        let y = body.var("y", Type::reference(a));
        vars = (x, y);
        body.new_obj(x, a);
        body.copy(y, x);
        body.ret(None);
    });
    let world = b.finish(main);
    let result = run_with(&world, "ci");

    let (x, y) = vars;
    assert_eq!(obj_count(&result, x), 1);
    assert_eq!(obj_count(&result, y), 1);
    assert!(result.may_alias(x, y));

    // the context-sensitive query agrees under the empty context
    let empty = result.contexts().empty();
    assert_eq!(result.points_to_set(empty, x).unwrap().len(), 1);
}

#[test]
fn test_recursive_calls_converge() {
    // rec(p) { r = rec(p); return p; } — cyclic PFG and call graph,
    // the fixpoint still terminates
    let mut b = WorldBuilder::new();
    let a = b.add_class("A", None);
    let rec = b.add_method(a, "rec(A)", true);
    b.set_body(rec, |body| {
        let p = body.param("p", Type::reference(a));
        let r = body.var("r", Type::reference(a));
        body.call_static(Some(r), a, "rec(A)", vec![p]);
        body.ret(Some(p));
    });
    let mut vars = (0, 0);
    let main = b.add_static_method(a, "main()", |body| {
        let o = body.var("o", Type::reference(a));
        let x = body.var("x", Type::reference(a));
        vars = (o, x);
        body.new_obj(o, a);
        body.call_static(Some(x), a, "rec(A)", vec![o]);
        body.ret(None);
    });
    let world = b.finish(main);
    let result = run_with(&world, "ci");

    let (o, x) = vars;
    assert!(result.call_graph().is_reachable(rec));
    assert!(result.may_alias(o, x));
}

#[test]
fn test_field_store_load_through_alias() {
    // p = new A; q = p; p.f = new B; r = q.f  =>  r points to the B object
    let mut b = WorldBuilder::new();
    let a = b.add_class("A", None);
    let bb = b.add_class("B", None);
    let f = b.add_field(a, "f", Type::reference(bb));
    let mut vars = (0, 0);
    let main = b.add_static_method(a, "main()", |body| {
        let p = body.var("p", Type::reference(a));
        let q = body.var("q", Type::reference(a));
        let v = body.var("v", Type::reference(bb));
        let r = body.var("r", Type::reference(bb));
        vars = (v, r);
        body.new_obj(p, a);
        body.copy(q, p);
        body.new_obj(v, bb);
        body.store_field(Some(p), f, v);
        body.load_field(r, Some(q), f);
        body.ret(None);
    });
    let world = b.finish(main);
    let result = run_with(&world, "ci");

    let (v, r) = vars;
    assert_eq!(obj_count(&result, r), 1);
    assert!(result.may_alias(r, v));
}

#[test]
fn test_static_field_flow() {
    let mut b = WorldBuilder::new();
    let a = b.add_class("A", None);
    let f = b.add_static_field(a, "f", Type::reference(a));
    let mut vars = (0, 0);
    let main = b.add_static_method(a, "main()", |body| {
        let x = body.var("x", Type::reference(a));
        let y = body.var("y", Type::reference(a));
        vars = (x, y);
        body.new_obj(x, a);
        body.store_field(None, f, x);
        body.load_field(y, None, f);
        body.ret(None);
    });
    let world = b.finish(main);
    let result = run_with(&world, "ci");

    let (x, y) = vars;
    assert!(result.may_alias(x, y));
}

#[test]
fn test_array_elements_merge_per_object() {
    let mut b = WorldBuilder::new();
    let a = b.add_class("A", None);
    let mut vars = (0, 0, 0);
    let main = b.add_static_method(a, "main()", |body| {
        let arr = body.var("arr", Type::array_of(Type::reference(a)));
        let i = body.int_var("i");
        let o1 = body.var("o1", Type::reference(a));
        let o2 = body.var("o2", Type::reference(a));
        let r = body.var("r", Type::reference(a));
        vars = (o1, o2, r);
        body.new_array(arr, Type::reference(a));
        body.assign(i, 0);
        body.new_obj(o1, a);
        body.new_obj(o2, a);
        body.store_array(arr, i, o1);
        body.store_array(arr, i, o2);
        body.load_array(r, arr, i);
        body.ret(None);
    });
    let world = b.finish(main);
    let result = run_with(&world, "ci");

    let (o1, o2, r) = vars;
    // index-insensitive: the load sees both stored objects
    assert_eq!(obj_count(&result, r), 2);
    assert!(result.may_alias(r, o1));
    assert!(result.may_alias(r, o2));
}

#[test]
fn test_args_and_returns_bound_through_calls() {
    // static A id(A p) { return p; }  r = id(o)
    let mut b = WorldBuilder::new();
    let a = b.add_class("A", None);
    let id = b.add_method(a, "id(A)", true);
    b.set_body(id, |body| {
        let p = body.param("p", Type::reference(a));
        body.ret(Some(p));
    });
    let mut vars = (0, 0);
    let main = b.add_static_method(a, "main()", |body| {
        let o = body.var("o", Type::reference(a));
        let r = body.var("r", Type::reference(a));
        vars = (o, r);
        body.new_obj(o, a);
        body.call_static(Some(r), a, "id(A)", vec![o]);
        body.ret(None);
    });
    let world = b.finish(main);
    let result = run_with(&world, "ci");

    let (o, r) = vars;
    assert!(result.may_alias(o, r));
    assert!(result.call_graph().is_reachable(id));
}

#[test]
fn test_on_the_fly_dispatch_is_pts_driven() {
    // a = new Cat(); a.speak()  — only Cat.speak becomes reachable,
    // unlike CHA which also reaches Dog.speak
    let mut b = WorldBuilder::new();
    let animal = b.add_class("Animal", None);
    let cat = b.add_class("Cat", Some(animal));
    let dog = b.add_class("Dog", Some(animal));
    b.add_instance_method(animal, "speak()", |body| {
        body.ret(None);
    });
    let speak_cat = b.add_instance_method(cat, "speak()", |body| {
        body.ret(None);
    });
    let speak_dog = b.add_instance_method(dog, "speak()", |body| {
        body.ret(None);
    });
    let main = b.add_static_method(animal, "main()", |body| {
        let a = body.var("a", Type::reference(animal));
        body.new_obj(a, cat);
        body.call_virtual(None, a, animal, "speak()", vec![]);
        body.ret(None);
    });
    let world = b.finish(main);
    let result = run_with(&world, "ci");

    assert!(result.call_graph().is_reachable(speak_cat));
    assert!(!result.call_graph().is_reachable(speak_dog));

    let cha = classflow::features::callgraph::ChaBuilder::new(&world).build();
    assert!(cha.is_reachable(speak_dog));
}

#[test]
fn test_call_site_sensitivity_separates_identity_calls() {
    // a = id(o1); c = id(o2): context-insensitively both results merge,
    // 1-call keeps them apart
    let mut b = WorldBuilder::new();
    let top = b.add_class("Top", None);
    let ca = b.add_class("A", Some(top));
    let cb = b.add_class("B", Some(top));
    let id = b.add_method(top, "id(Top)", true);
    b.set_body(id, |body| {
        let p = body.param("p", Type::reference(top));
        body.ret(Some(p));
    });
    let mut vars = (0, 0);
    let main = b.add_static_method(top, "main()", |body| {
        let o1 = body.var("o1", Type::reference(ca));
        let o2 = body.var("o2", Type::reference(cb));
        let x = body.var("x", Type::reference(top));
        let y = body.var("y", Type::reference(top));
        vars = (x, y);
        body.new_obj(o1, ca);
        body.new_obj(o2, cb);
        body.call_static(Some(x), top, "id(Top)", vec![o1]);
        body.call_static(Some(y), top, "id(Top)", vec![o2]);
        body.ret(None);
    });
    let world = b.finish(main);

    let ci = run_with(&world, "ci");
    let one_call = run_with(&world, "1-call");

    let (x, y) = vars;
    assert_eq!(obj_count(&ci, x), 2);
    assert_eq!(obj_count(&ci, y), 2);
    assert_eq!(obj_count(&one_call, x), 1);
    assert_eq!(obj_count(&one_call, y), 1);
}

#[test]
fn test_object_sensitivity_separates_containers() {
    // two Boxes with set/get: 1-obj keeps their contents apart
    let mut b = WorldBuilder::new();
    let item = b.add_class("Item", None);
    let boxc = b.add_class("Box", None);
    let val = b.add_field(boxc, "val", Type::reference(item));
    let set = b.add_method(boxc, "set(Item)", false);
    b.set_body(set, |body| {
        let v = body.param("v", Type::reference(item));
        let this = body.this();
        body.store_field(Some(this), val, v);
        body.ret(None);
    });
    let get = b.add_method(boxc, "get()", false);
    b.set_body(get, |body| {
        let this = body.this();
        let r = body.var("r", Type::reference(item));
        body.load_field(r, Some(this), val);
        body.ret(Some(r));
    });
    let mut vars = (0, 0, 0);
    let main = b.add_static_method(boxc, "main()", |body| {
        let b1 = body.var("b1", Type::reference(boxc));
        let b2 = body.var("b2", Type::reference(boxc));
        let o1 = body.var("o1", Type::reference(item));
        let o2 = body.var("o2", Type::reference(item));
        let x = body.var("x", Type::reference(item));
        vars = (o1, o2, x);
        body.new_obj(b1, boxc);
        body.new_obj(b2, boxc);
        body.new_obj(o1, item);
        body.new_obj(o2, item);
        body.call_virtual(None, b1, boxc, "set(Item)", vec![o1]);
        body.call_virtual(None, b2, boxc, "set(Item)", vec![o2]);
        body.call_virtual(Some(x), b1, boxc, "get()", vec![]);
        body.ret(None);
    });
    let world = b.finish(main);

    let ci = run_with(&world, "ci");
    let one_obj = run_with(&world, "1-obj");

    let (_, o2, x) = vars;
    assert_eq!(obj_count(&ci, x), 2);
    assert_eq!(obj_count(&one_obj, x), 1);
    assert!(!one_obj.may_alias(x, o2));
}

#[test]
fn test_two_call_refines_nested_identity() {
    // wrap(p) { return id(p) } — 1-call merges at the inner call site,
    // 2-call still distinguishes the outer callers
    let mut b = WorldBuilder::new();
    let top = b.add_class("Top", None);
    let id = b.add_method(top, "id(Top)", true);
    b.set_body(id, |body| {
        let p = body.param("p", Type::reference(top));
        body.ret(Some(p));
    });
    let wrap = b.add_method(top, "wrap(Top)", true);
    b.set_body(wrap, |body| {
        let p = body.param("p", Type::reference(top));
        let r = body.var("r", Type::reference(top));
        body.call_static(Some(r), top, "id(Top)", vec![p]);
        body.ret(Some(r));
    });
    let mut vars = (0, 0);
    let main = b.add_static_method(top, "main()", |body| {
        let o1 = body.var("o1", Type::reference(top));
        let o2 = body.var("o2", Type::reference(top));
        let x = body.var("x", Type::reference(top));
        let y = body.var("y", Type::reference(top));
        vars = (x, y);
        body.new_obj(o1, top);
        body.new_obj(o2, top);
        body.call_static(Some(x), top, "wrap(Top)", vec![o1]);
        body.call_static(Some(y), top, "wrap(Top)", vec![o2]);
        body.ret(None);
    });
    let world = b.finish(main);

    let one_call = run_with(&world, "1-call");
    let two_call = run_with(&world, "2-call");

    let (x, y) = vars;
    assert_eq!(obj_count(&one_call, x), 2);
    assert_eq!(obj_count(&one_call, y), 2);
    assert_eq!(obj_count(&two_call, x), 1);
    assert_eq!(obj_count(&two_call, y), 1);
}

#[test]
fn test_type_sensitivity_runs_and_is_sound() {
    let mut b = WorldBuilder::new();
    let a = b.add_class("A", None);
    let mut xv = 0;
    let main = b.add_static_method(a, "main()", |body| {
        let x = body.var("x", Type::reference(a));
        let y = body.var("y", Type::reference(a));
        xv = y;
        body.new_obj(x, a);
        body.copy(y, x);
        body.ret(None);
    });
    let world = b.finish(main);
    for policy in ["1-type", "2-type", "2-obj"] {
        let result = run_with(&world, policy);
        assert_eq!(obj_count(&result, xv), 1, "policy {policy}");
    }
}

#[test]
fn test_result_registry_roundtrip() {
    let mut b = WorldBuilder::new();
    let a = b.add_class("A", None);
    let main = b.add_static_method(a, "main()", |body| {
        body.ret(None);
    });
    let mut world = b.finish(main);

    let options = AnalysisOptions::new();
    PointerAnalysis::run_and_store(&mut world, &options).unwrap();
    let stored = world
        .result::<classflow::features::pta::PointerAnalysisResult>("pta")
        .unwrap();
    assert_eq!(stored.call_graph().reachable_methods().len(), 1);
}
