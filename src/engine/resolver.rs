// src/engine/resolver.rs

//! Input resolution, immediately before invocation.

use std::collections::{BTreeMap, HashMap};

use crate::errors::{Result, StagedagError};
use crate::graph::reference::TaskKey;
use crate::graph::{Arg, Graph, Input, Inputs};

/// Completed output paths, filled in by the runner as tasks finish or are
/// skipped over an existing artifact. Written once per task, read by every
/// downstream resolution in the same run.
pub(crate) type CompletedOutputs = HashMap<TaskKey, String>;

/// Resolve a task's declared inputs into the keyword arguments its transform
/// receives.
///
/// Literals and lists pass through unchanged. Upstream references substitute
/// the recorded output path of their target, which must already be in the
/// table: the plan executes dependencies first, so a miss here is an ordering
/// bug in the engine rather than a user-facing configuration error.
///
/// References stay symbolic until this point; nothing is resolved at
/// registration time, which is what allows a task to reference another task
/// that has not executed yet when it is declared.
pub(crate) fn resolve_inputs(
    owner: &Graph,
    inputs: &Inputs,
    completed: &CompletedOutputs,
) -> Result<BTreeMap<String, Arg>> {
    let mut args = BTreeMap::new();

    for (key, input) in inputs.iter() {
        let arg = match input {
            Input::Literal(value) => Arg::Value(value.clone()),
            Input::List(values) => Arg::Values(values.clone()),
            Input::Upstream(dep) => Arg::Value(lookup(completed, &dep.key(), dep.task_name())?),
            Input::UpstreamNamed(name) => {
                Arg::Value(lookup(completed, &owner.key_for(name), name)?)
            }
        };
        args.insert(key.to_string(), arg);
    }

    Ok(args)
}

fn lookup(completed: &CompletedOutputs, key: &TaskKey, task: &str) -> Result<String> {
    completed
        .get(key)
        .cloned()
        .ok_or_else(|| StagedagError::UnresolvedReference(task.to_string()))
}
