use std::sync::{Arc, Mutex};

use stagedag::engine::{Engine, RunSpec, TaskStatus};
use stagedag::errors::StagedagError;
use stagedag::graph::{Graph, Inputs, Invocation, Params};
use stagedag::store::MockStore;
use stagedag_test_utils::{RecordingTransform, invocation_log, logged};

#[test]
fn cross_graph_reference_executes_the_dependency_first() {
    let store = MockStore::new();
    let log = invocation_log();
    let captured: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

    let mut reference_data = Graph::new("reference_data", "/staging");
    reference_data
        .add_task(
            "g",
            RecordingTransform::new("g", &store, &log),
            "out/g",
            Inputs::new(),
            Params::new(),
        )
        .unwrap();

    let mut cohort = Graph::new("cohort", "/staging");
    let h_store = store.clone();
    let h_captured = Arc::clone(&captured);
    cohort
        .add_task(
            "h",
            move |call: &Invocation<'_>| -> anyhow::Result<()> {
                *h_captured.lock().unwrap() = call.value("sites").map(str::to_string);
                h_store.put(call.output_path);
                Ok(())
            },
            "out/h",
            Inputs::new().upstream("sites", &reference_data.get_task("g").unwrap()),
            Params::new(),
        )
        .unwrap();

    let report = Engine::with_store(Box::new(store))
        .run(&[&reference_data, &cohort], &RunSpec::targets(["h"]))
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.status_of("g"), Some(TaskStatus::Done));
    assert_eq!(report.status_of("h"), Some(TaskStatus::Done));
    assert_eq!(logged(&log), vec!["g"]);
    assert_eq!(captured.lock().unwrap().as_deref(), Some("/staging/out/g"));
}

#[test]
fn target_closure_excludes_unrelated_tasks() {
    let store = MockStore::new();
    let log = invocation_log();

    let mut reference_data = Graph::new("reference_data", "/staging");
    let g = reference_data
        .add_task(
            "g",
            RecordingTransform::new("g", &store, &log),
            "out/g",
            Inputs::new(),
            Params::new(),
        )
        .unwrap();
    reference_data
        .add_task(
            "unrelated",
            RecordingTransform::new("unrelated", &store, &log),
            "out/unrelated",
            Inputs::new(),
            Params::new(),
        )
        .unwrap();

    let mut cohort = Graph::new("cohort", "/staging");
    cohort
        .add_task(
            "h",
            RecordingTransform::new("h", &store, &log),
            "out/h",
            Inputs::new().upstream("sites", &g),
            Params::new(),
        )
        .unwrap();

    let report = Engine::with_store(Box::new(store))
        .run(&[&reference_data, &cohort], &RunSpec::targets(["h"]))
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.status_of("unrelated"), None);
    assert_eq!(logged(&log), vec!["g", "h"]);
}

#[test]
fn reference_into_a_graph_missing_from_the_run_fails() {
    let store = MockStore::new();
    let log = invocation_log();

    let mut reference_data = Graph::new("reference_data", "/staging");
    let g = reference_data
        .add_task(
            "g",
            RecordingTransform::new("g", &store, &log),
            "out/g",
            Inputs::new(),
            Params::new(),
        )
        .unwrap();

    let mut cohort = Graph::new("cohort", "/staging");
    cohort
        .add_task(
            "h",
            RecordingTransform::new("h", &store, &log),
            "out/h",
            Inputs::new().upstream("sites", &g),
            Params::new(),
        )
        .unwrap();

    // reference_data is not part of the run, so "g" cannot be scheduled.
    let err = Engine::with_store(Box::new(store))
        .run(&[&cohort], &RunSpec::targets(["h"]))
        .unwrap_err();

    match err {
        StagedagError::TaskNotFound { graph, task } => {
            assert_eq!(graph, "reference_data");
            assert_eq!(task, "g");
        }
        other => panic!("expected TaskNotFound, got {other:?}"),
    }
    assert!(logged(&log).is_empty());
}

#[test]
fn equal_task_names_in_different_graphs_do_not_collide() {
    let store = MockStore::new();
    let log = invocation_log();

    let mut upstream = Graph::new("upstream", "/staging/one");
    let normalize = upstream
        .add_task(
            "normalize",
            RecordingTransform::new("upstream:normalize", &store, &log),
            "out/normalize",
            Inputs::new(),
            Params::new(),
        )
        .unwrap();

    let mut downstream = Graph::new("downstream", "/staging/two");
    downstream
        .add_task(
            "normalize",
            RecordingTransform::new("downstream:normalize", &store, &log),
            "out/normalize",
            Inputs::new().upstream("sites", &normalize),
            Params::new(),
        )
        .unwrap();

    let report = Engine::with_store(Box::new(store))
        .run(&[&upstream, &downstream], &RunSpec::everything())
        .unwrap();

    assert!(report.is_success());
    assert_eq!(
        logged(&log),
        vec!["upstream:normalize", "downstream:normalize"]
    );
}
