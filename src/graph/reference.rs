// src/graph/reference.rs

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identifier for a [`Graph`](crate::graph::Graph) instance.
///
/// Tasks are namespaced by their owning graph, so a run over the union of
/// several graphs never collides on bare task names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GraphId(u64);

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(0);

impl GraphId {
    pub(crate) fn next() -> Self {
        GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Key identifying one task within a union of graphs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct TaskKey {
    pub graph: GraphId,
    pub task: Arc<str>,
}

/// Symbolic handle to another task's output artifact.
///
/// A reference is handed out when a task is registered (or looked up with
/// [`Graph::get_task`](crate::graph::Graph::get_task)) and can be declared as
/// an input of any other task, including tasks in a different graph. Holding
/// one does not imply the artifact exists: the engine substitutes the
/// concrete path only once the referenced task has completed (or been skipped
/// over an existing artifact) in the current run.
///
/// [`Reference::path`] is the statically resolved absolute output path
/// (staging root joined with the task's relative output path). It is a plain
/// string computation for wiring paths outside the graph, not a readiness
/// signal.
#[derive(Debug, Clone)]
pub struct Reference {
    graph: GraphId,
    graph_name: Arc<str>,
    task: Arc<str>,
    path: Arc<str>,
}

impl Reference {
    pub(crate) fn new(
        graph: GraphId,
        graph_name: Arc<str>,
        task: Arc<str>,
        path: Arc<str>,
    ) -> Self {
        Self {
            graph,
            graph_name,
            task,
            path,
        }
    }

    /// Name of the graph owning the referenced task.
    pub fn graph_name(&self) -> &str {
        &self.graph_name
    }

    /// Name of the referenced task.
    pub fn task_name(&self) -> &str {
        &self.task
    }

    /// Absolute output path of the referenced task.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn key(&self) -> TaskKey {
        TaskKey {
            graph: self.graph,
            task: Arc::clone(&self.task),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.graph_name, self.task)
    }
}
