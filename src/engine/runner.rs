// src/engine/runner.rs

//! Sequential execution of a plan.

use std::collections::HashMap;

use tracing::{debug, error, info};

use crate::engine::RunSpec;
use crate::engine::plan::ExecutionPlan;
use crate::engine::report::{RunReport, TaskStatus};
use crate::engine::resolver::{CompletedOutputs, resolve_inputs};
use crate::errors::{Result, StagedagError};
use crate::graph::{Graph, Invocation};
use crate::store::{ArtifactStore, LocalStore};

/// Executes task graphs.
///
/// The engine is single-threaded: it plans the target closure, then walks it
/// in dependency order, one blocking invocation at a time. Each transform is
/// expected to dispatch its real work to an external distributed engine and
/// return (or fail) once that work is finished; the orchestrator itself never
/// parallelises.
#[derive(Debug)]
pub struct Engine {
    store: Box<dyn ArtifactStore>,
}

impl Engine {
    /// Engine checking artifacts on the local filesystem.
    pub fn new() -> Self {
        Self {
            store: Box::new(LocalStore),
        }
    }

    /// Engine over a caller-supplied artifact store.
    pub fn with_store(store: Box<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// Run the union of `graphs` against a run specification.
    ///
    /// Definition errors (unknown targets, dangling references, cycles) fail
    /// before anything executes. Invocation failures do not abort the run:
    /// the failed task and its dependents are recorded in the report while
    /// independent branches of the closure keep running, so a subsequent run
    /// can resume from the artifacts that did complete.
    pub fn run(&self, graphs: &[&Graph], spec: &RunSpec) -> Result<RunReport> {
        let plan = ExecutionPlan::build(graphs, spec)?;
        info!(tasks = plan.order.len(), force = spec.force, "starting run");

        let mut completed: CompletedOutputs = HashMap::new();
        let mut statuses: HashMap<usize, TaskStatus> = plan
            .order
            .iter()
            .map(|&idx| (idx, TaskStatus::Pending))
            .collect();
        let mut report = RunReport::default();

        for &idx in &plan.order {
            let node = &plan.nodes[idx];
            let graph = node.graph.name();
            let task = node.task.name();
            let path = node.task.path();

            // An upstream failure blocks the whole downstream cone.
            let upstream_failed = node
                .deps
                .iter()
                .any(|dep| matches!(statuses[dep], TaskStatus::Failed | TaskStatus::Blocked));
            if upstream_failed {
                statuses.insert(idx, TaskStatus::Blocked);
                report.record(graph, task, TaskStatus::Blocked);
                continue;
            }

            if !spec.force && self.store.exists(path) {
                debug!(graph = %graph, task = %task, path = %path, "artifact present; skipping");
                statuses.insert(idx, TaskStatus::Skipped);
                completed.insert(node.key.clone(), path.to_string());
                report.record(graph, task, TaskStatus::Skipped);
                continue;
            }

            statuses.insert(idx, TaskStatus::Running);
            let args = resolve_inputs(node.graph, node.task.inputs(), &completed)?;
            let call = Invocation {
                args,
                params: node.task.params(),
                output_path: path,
            };

            info!(graph = %graph, task = %task, path = %path, "running task");
            match node.task.transform().apply(&call) {
                Ok(()) => {
                    statuses.insert(idx, TaskStatus::Done);
                    completed.insert(node.key.clone(), path.to_string());
                    report.record(graph, task, TaskStatus::Done);
                }
                Err(source) => {
                    error!(graph = %graph, task = %task, "task failed: {source:#}");
                    statuses.insert(idx, TaskStatus::Failed);
                    report.record(graph, task, TaskStatus::Failed);
                    report.record_failure(StagedagError::TaskFailed {
                        task: task.to_string(),
                        source,
                    });
                }
            }
        }

        Ok(report)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
