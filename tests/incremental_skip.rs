use std::sync::{Arc, Mutex};

use stagedag::engine::{Engine, RunSpec, TaskStatus};
use stagedag::graph::{Graph, Inputs, Invocation, Params};
use stagedag::store::MockStore;
use stagedag_test_utils::builders::chain_graph;
use stagedag_test_utils::{RecordingTransform, invocation_log, logged};

#[test]
fn second_run_skips_everything_and_invokes_nothing() {
    let store = MockStore::new();
    let log = invocation_log();
    let graph = chain_graph("etl", "/staging", &store, &log, &["a", "b", "c"]).unwrap();
    let engine = Engine::with_store(Box::new(store));

    let first = engine.run(&[&graph], &RunSpec::everything()).unwrap();
    assert!(first.is_success());
    assert_eq!(first.count(TaskStatus::Done), 3);
    assert_eq!(logged(&log), vec!["a", "b", "c"]);

    let second = engine.run(&[&graph], &RunSpec::everything()).unwrap();
    assert!(second.is_success());
    assert_eq!(second.count(TaskStatus::Skipped), 3);
    assert_eq!(second.count(TaskStatus::Done), 0);
    // No further invocations happened.
    assert_eq!(logged(&log).len(), 3);
}

#[test]
fn force_reruns_every_task_in_the_closure() {
    let store = MockStore::new();
    let log = invocation_log();
    let graph = chain_graph("etl", "/staging", &store, &log, &["a", "b"]).unwrap();
    let engine = Engine::with_store(Box::new(store));

    engine.run(&[&graph], &RunSpec::everything()).unwrap();
    let forced = engine
        .run(&[&graph], &RunSpec::everything().force(true))
        .unwrap();

    assert_eq!(forced.count(TaskStatus::Done), 2);
    assert_eq!(forced.count(TaskStatus::Skipped), 0);
    assert_eq!(logged(&log), vec!["a", "b", "a", "b"]);
}

#[test]
fn partially_complete_pipeline_only_recomputes_missing_artifacts() {
    let store = MockStore::new();
    let log = invocation_log();
    let graph = chain_graph("etl", "/staging", &store, &log, &["a", "b", "c"]).unwrap();

    // "a" already completed in an earlier run.
    store.put("/staging/out/a");

    let report = Engine::with_store(Box::new(store))
        .run(&[&graph], &RunSpec::everything())
        .unwrap();

    assert_eq!(report.status_of("a"), Some(TaskStatus::Skipped));
    assert_eq!(report.status_of("b"), Some(TaskStatus::Done));
    assert_eq!(report.status_of("c"), Some(TaskStatus::Done));
    assert_eq!(logged(&log), vec!["b", "c"]);
}

#[test]
fn skipped_dependency_still_resolves_for_downstream_tasks() {
    let store = MockStore::new();
    let log = invocation_log();
    let captured: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

    let mut graph = Graph::new("etl", "/staging");
    let a = graph
        .add_task(
            "a",
            RecordingTransform::new("a", &store, &log),
            "out/a",
            Inputs::new(),
            Params::new(),
        )
        .unwrap();

    let downstream_store = store.clone();
    let downstream_captured = Arc::clone(&captured);
    graph
        .add_task(
            "b",
            move |call: &Invocation<'_>| -> anyhow::Result<()> {
                *downstream_captured.lock().unwrap() =
                    call.value("upstream").map(str::to_string);
                downstream_store.put(call.output_path);
                Ok(())
            },
            "out/b",
            Inputs::new().upstream("upstream", &a),
            Params::new(),
        )
        .unwrap();

    // "a" is already on disk, so only "b" runs; its reference must still
    // resolve to "a"'s path.
    store.put("/staging/out/a");
    let report = Engine::with_store(Box::new(store))
        .run(&[&graph], &RunSpec::everything())
        .unwrap();

    assert_eq!(report.status_of("a"), Some(TaskStatus::Skipped));
    assert_eq!(report.status_of("b"), Some(TaskStatus::Done));
    assert_eq!(
        captured.lock().unwrap().as_deref(),
        Some("/staging/out/a")
    );
}
