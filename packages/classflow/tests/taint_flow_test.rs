//! End-to-end taint scenarios: source → sink, transfers across calls,
//! re-typing, and configuration errors.

use classflow::config::AnalysisOptions;
use classflow::features::pta::PointerAnalysis;
use classflow::features::taint::TaintFlow;
use classflow::ir::builder::WorldBuilder;
use classflow::ir::hierarchy::ClassId;
use classflow::ir::types::Type;
use classflow::ir::world::World;
use std::io::Write;

/// A world with the taint API: TaintedData, SourceSink.source(),
/// SourceSink.sink(TaintedData), SourceSink.pass(TaintedData).
fn api_world() -> (WorldBuilder, ClassId, ClassId) {
    let mut b = WorldBuilder::new();
    let tainted = b.add_class("TaintedData", None);
    let api = b.add_class("SourceSink", None);
    b.add_static_method(api, "source()", |body| {
        body.ret(None);
    });
    b.add_static_method(api, "sink(TaintedData)", |body| {
        body.param("v", Type::reference(tainted));
        body.ret(None);
    });
    // the body does NOT forward its argument: flow only exists through
    // the configured transfer
    b.add_static_method(api, "pass(TaintedData)", |body| {
        body.param("p", Type::reference(tainted));
        body.ret(None);
    });
    (b, tainted, api)
}

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

fn run_taint(world: &World, config: &tempfile::NamedTempFile) -> Vec<TaintFlow> {
    let options = AnalysisOptions::new().with_taint_config(config.path());
    let result = PointerAnalysis::run(world, &options).unwrap();
    result.taint_flows().to_vec()
}

const CONFIG: &str = r#"{
    "sources": [{"class": "SourceSink", "method": "source()", "type": "TaintedData"}],
    "sinks": [{"class": "SourceSink", "method": "sink(TaintedData)", "index": 0}],
    "transfers": [{"class": "SourceSink", "method": "pass(TaintedData)",
                   "from": "ARG0", "to": "RESULT", "type": "TaintedData"}]
}"#;

#[test]
fn test_direct_source_to_sink() {
    let (mut b, tainted, api) = api_world();
    let mut sites = (0, 0);
    let main = b.add_static_method(api, "main()", |body| {
        let x = body.var("x", Type::reference(tainted));
        sites.0 = body.call_static(Some(x), api, "source()", vec![]);
        sites.1 = body.call_static(None, api, "sink(TaintedData)", vec![x]);
        body.ret(None);
    });
    let world = b.finish(main);
    let config = write_config(CONFIG);
    let flows = run_taint(&world, &config);

    let body = world.method(main).ir().body_stmts().to_vec();
    assert_eq!(
        flows,
        vec![TaintFlow {
            source_call: body[sites.0],
            sink_call: body[sites.1],
            index: 0,
        }]
    );
}

#[test]
fn test_flow_through_transfer() {
    // x = source(); y = pass(x); sink(y)  — exactly one flow, through the
    // ARG0 → RESULT transfer (pass's body drops its argument)
    let (mut b, tainted, api) = api_world();
    let mut sites = (0, 0);
    let main = b.add_static_method(api, "main()", |body| {
        let x = body.var("x", Type::reference(tainted));
        let y = body.var("y", Type::reference(tainted));
        sites.0 = body.call_static(Some(x), api, "source()", vec![]);
        body.call_static(Some(y), api, "pass(TaintedData)", vec![x]);
        sites.1 = body.call_static(None, api, "sink(TaintedData)", vec![y]);
        body.ret(None);
    });
    let world = b.finish(main);
    let config = write_config(CONFIG);
    let flows = run_taint(&world, &config);

    let body = world.method(main).ir().body_stmts().to_vec();
    assert_eq!(
        flows,
        vec![TaintFlow {
            source_call: body[sites.0],
            sink_call: body[sites.1],
            index: 0,
        }]
    );
}

#[test]
fn test_no_transfer_no_flow() {
    // without the transfer configuration, pass() severs the flow
    let (mut b, tainted, api) = api_world();
    let main = b.add_static_method(api, "main()", |body| {
        let x = body.var("x", Type::reference(tainted));
        let y = body.var("y", Type::reference(tainted));
        body.call_static(Some(x), api, "source()", vec![]);
        body.call_static(Some(y), api, "pass(TaintedData)", vec![x]);
        body.call_static(None, api, "sink(TaintedData)", vec![y]);
        body.ret(None);
    });
    let world = b.finish(main);
    let config = write_config(
        r#"{
        "sources": [{"class": "SourceSink", "method": "source()", "type": "TaintedData"}],
        "sinks": [{"class": "SourceSink", "method": "sink(TaintedData)", "index": 0}]
    }"#,
    );
    let flows = run_taint(&world, &config);
    assert!(flows.is_empty());
}

#[test]
fn test_taint_flows_through_pointer_flow() {
    // taint rides the ordinary pointer flow: copies and heap round-trips
    let (mut b, tainted, api) = api_world();
    let holder = b.add_class("Holder", None);
    let f = b.add_field(holder, "f", Type::reference(tainted));
    let mut sites = (0, 0);
    let main = b.add_static_method(api, "main()", |body| {
        let x = body.var("x", Type::reference(tainted));
        let h = body.var("h", Type::reference(holder));
        let y = body.var("y", Type::reference(tainted));
        sites.0 = body.call_static(Some(x), api, "source()", vec![]);
        body.new_obj(h, holder);
        body.store_field(Some(h), f, x);
        body.load_field(y, Some(h), f);
        sites.1 = body.call_static(None, api, "sink(TaintedData)", vec![y]);
        body.ret(None);
    });
    let world = b.finish(main);
    let config = write_config(CONFIG);
    let flows = run_taint(&world, &config);

    let body = world.method(main).ir().body_stmts().to_vec();
    assert_eq!(
        flows,
        vec![TaintFlow {
            source_call: body[sites.0],
            sink_call: body[sites.1],
            index: 0,
        }]
    );
}

#[test]
fn test_two_sources_two_flows_ordered() {
    let (mut b, tainted, api) = api_world();
    let main = b.add_static_method(api, "main()", |body| {
        let x = body.var("x", Type::reference(tainted));
        let y = body.var("y", Type::reference(tainted));
        body.call_static(Some(x), api, "source()", vec![]);
        body.call_static(Some(y), api, "source()", vec![]);
        body.call_static(None, api, "sink(TaintedData)", vec![x]);
        body.call_static(None, api, "sink(TaintedData)", vec![y]);
        body.ret(None);
    });
    let world = b.finish(main);
    let config = write_config(CONFIG);
    let flows = run_taint(&world, &config);

    assert_eq!(flows.len(), 2);
    // deterministically ordered ascending by (source, sink, index)
    assert!(flows[0] < flows[1]);
}

#[test]
fn test_missing_config_file_refuses_run() {
    let (mut b, _, api) = api_world();
    let main = b.add_static_method(api, "main()", |body| {
        body.ret(None);
    });
    let world = b.finish(main);
    let options = AnalysisOptions::new().with_taint_config("/nonexistent/taint.json");
    assert!(PointerAnalysis::run(&world, &options).is_err());
}

#[test]
fn test_base_transfer_taints_receiver() {
    // builder.append(x) transfers ARG0 → BASE; sink(builder) reports
    let mut b = WorldBuilder::new();
    let tainted = b.add_class("TaintedData", None);
    let api = b.add_class("SourceSink", None);
    let sb = b.add_class("Builder", None);
    b.add_static_method(api, "source()", |body| {
        body.ret(None);
    });
    b.add_static_method(api, "sinkB(Builder)", |body| {
        body.param("v", Type::reference(sb));
        body.ret(None);
    });
    b.add_instance_method(sb, "append(TaintedData)", |body| {
        body.param("s", Type::reference(tainted));
        body.ret(None);
    });
    let mut sites = (0, 0);
    let main = b.add_static_method(api, "main()", |body| {
        let x = body.var("x", Type::reference(tainted));
        let builder = body.var("builder", Type::reference(sb));
        sites.0 = body.call_static(Some(x), api, "source()", vec![]);
        body.new_obj(builder, sb);
        body.call_virtual(None, builder, sb, "append(TaintedData)", vec![x]);
        sites.1 = body.call_static(None, api, "sinkB(Builder)", vec![builder]);
        body.ret(None);
    });
    let world = b.finish(main);
    let config = write_config(
        r#"{
        "sources": [{"class": "SourceSink", "method": "source()", "type": "TaintedData"}],
        "sinks": [{"class": "SourceSink", "method": "sinkB(Builder)", "index": 0}],
        "transfers": [{"class": "Builder", "method": "append(TaintedData)",
                       "from": "ARG0", "to": "BASE", "type": "Builder"}]
    }"#,
    );
    let flows = run_taint(&world, &config);

    let body = world.method(main).ir().body_stmts().to_vec();
    assert_eq!(
        flows,
        vec![TaintFlow {
            source_call: body[sites.0],
            sink_call: body[sites.1],
            index: 0,
        }]
    );
}
