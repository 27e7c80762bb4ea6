#![allow(dead_code)]

use stagedag::errors::Result;
use stagedag::graph::{Graph, Inputs, Params, Reference};
use stagedag::store::MockStore;

use crate::transforms::{InvocationLog, RecordingTransform};

/// Build a graph whose tasks form a linear chain: each task depends on the
/// previous one. Output paths are `out/<name>`; every task records into the
/// shared log and persists into the shared store.
pub fn chain_graph(
    name: &str,
    staging_root: &str,
    store: &MockStore,
    log: &InvocationLog,
    tasks: &[&str],
) -> Result<Graph> {
    let mut graph = Graph::new(name, staging_root);
    let mut previous: Option<Reference> = None;

    for task in tasks {
        let mut inputs = Inputs::new();
        if let Some(dep) = &previous {
            inputs = inputs.upstream("upstream", dep);
        }
        let reference = graph.add_task(
            task,
            RecordingTransform::new(task, store, log),
            &format!("out/{task}"),
            inputs,
            Params::new(),
        )?;
        previous = Some(reference);
    }

    Ok(graph)
}

/// Register a standalone recording task with no dependencies.
pub fn standalone_task(
    graph: &mut Graph,
    name: &str,
    store: &MockStore,
    log: &InvocationLog,
) -> Result<Reference> {
    graph.add_task(
        name,
        RecordingTransform::new(name, store, log),
        &format!("out/{name}"),
        Inputs::new(),
        Params::new(),
    )
}
