use stagedag::engine::{Engine, RunSpec};
use stagedag::errors::StagedagError;
use stagedag::graph::{Graph, Inputs, Params};
use stagedag::store::MockStore;
use stagedag_test_utils::{RecordingTransform, invocation_log, logged};

#[test]
fn two_task_cycle_is_rejected_before_any_execution() {
    let store = MockStore::new();
    let log = invocation_log();
    let mut graph = Graph::new("cyclic", "/staging");

    // "a" forward-declares its dependency on "b" by name; "b" then closes
    // the loop with the handle returned for "a".
    let a = graph
        .add_task(
            "a",
            RecordingTransform::new("a", &store, &log),
            "out/a",
            Inputs::new().upstream_named("sites", "b"),
            Params::new(),
        )
        .unwrap();
    graph
        .add_task(
            "b",
            RecordingTransform::new("b", &store, &log),
            "out/b",
            Inputs::new().upstream("sites", &a),
            Params::new(),
        )
        .unwrap();

    let err = Engine::with_store(Box::new(store))
        .run(&[&graph], &RunSpec::everything())
        .unwrap_err();

    assert!(matches!(err, StagedagError::CycleDetected(_)));
    let message = err.to_string();
    assert!(
        message.contains("cyclic:a") && message.contains("cyclic:b"),
        "cycle error should name its members: {message}"
    );
    assert!(logged(&log).is_empty(), "no task may run on a cyclic graph");
}

#[test]
fn transitive_cycle_is_rejected() {
    let store = MockStore::new();
    let log = invocation_log();
    let mut graph = Graph::new("cyclic", "/staging");

    let a = graph
        .add_task(
            "a",
            RecordingTransform::new("a", &store, &log),
            "out/a",
            Inputs::new().upstream_named("sites", "c"),
            Params::new(),
        )
        .unwrap();
    let b = graph
        .add_task(
            "b",
            RecordingTransform::new("b", &store, &log),
            "out/b",
            Inputs::new().upstream("sites", &a),
            Params::new(),
        )
        .unwrap();
    graph
        .add_task(
            "c",
            RecordingTransform::new("c", &store, &log),
            "out/c",
            Inputs::new().upstream("sites", &b),
            Params::new(),
        )
        .unwrap();

    let err = Engine::with_store(Box::new(store))
        .run(&[&graph], &RunSpec::everything())
        .unwrap_err();

    assert!(matches!(err, StagedagError::CycleDetected(_)));
    assert!(logged(&log).is_empty());
}

#[test]
fn self_reference_is_rejected() {
    let store = MockStore::new();
    let log = invocation_log();
    let mut graph = Graph::new("selfloop", "/staging");

    graph
        .add_task(
            "a",
            RecordingTransform::new("a", &store, &log),
            "out/a",
            Inputs::new().upstream_named("sites", "a"),
            Params::new(),
        )
        .unwrap();

    let err = Engine::with_store(Box::new(store))
        .run(&[&graph], &RunSpec::everything())
        .unwrap_err();

    assert!(matches!(err, StagedagError::CycleDetected(_)));
    assert!(logged(&log).is_empty());
}

#[test]
fn dangling_forward_reference_is_rejected() {
    let store = MockStore::new();
    let log = invocation_log();
    let mut graph = Graph::new("dangling", "/staging");

    graph
        .add_task(
            "a",
            RecordingTransform::new("a", &store, &log),
            "out/a",
            Inputs::new().upstream_named("sites", "never_registered"),
            Params::new(),
        )
        .unwrap();

    let err = Engine::with_store(Box::new(store))
        .run(&[&graph], &RunSpec::everything())
        .unwrap_err();

    assert!(matches!(err, StagedagError::TaskNotFound { .. }));
    assert!(logged(&log).is_empty());
}
