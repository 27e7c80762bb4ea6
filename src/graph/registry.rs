// src/graph/registry.rs

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::errors::{Result, StagedagError};
use crate::graph::reference::{GraphId, Reference, TaskKey};
use crate::graph::task::{Inputs, Params, Task, Transform};

/// Registry of tasks for one pipeline.
///
/// A graph owns its tasks exclusively and preserves registration order, which
/// the engine uses as the deterministic tie-break between independent tasks.
/// Tasks in one graph may reference tasks registered in another graph; the
/// engine treats the union of all graphs handed to it as a single dependency
/// graph.
pub struct Graph {
    id: GraphId,
    name: Arc<str>,
    staging_root: String,
    tasks: Vec<Task>,
    index: HashMap<Arc<str>, usize>,
    outputs: BTreeMap<String, String>,
}

impl Graph {
    /// Create an empty graph resolving output paths under `staging_root`.
    ///
    /// The staging root is a local directory or a remote object-store prefix
    /// (e.g. `gs://bucket/staging`); it is threaded in explicitly, typically
    /// from the selected `[env.<name>]` configuration section.
    pub fn new(name: impl Into<String>, staging_root: impl Into<String>) -> Self {
        let staging_root = staging_root.into().trim_end_matches('/').to_string();
        Self {
            id: GraphId::next(),
            name: Arc::from(name.into().as_str()),
            staging_root,
            tasks: Vec::new(),
            index: HashMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn staging_root(&self) -> &str {
        &self.staging_root
    }

    /// Register a task and return a reference to its future output.
    ///
    /// The reference is usable immediately as an input of other tasks, in
    /// this graph or any other. Task names are unique per graph; registering
    /// the same name twice is a definition error.
    pub fn add_task<T>(
        &mut self,
        name: &str,
        transform: T,
        output_path: &str,
        inputs: Inputs,
        params: Params,
    ) -> Result<Reference>
    where
        T: Transform + 'static,
    {
        if self.index.contains_key(name) {
            return Err(StagedagError::DuplicateTask {
                graph: self.name.to_string(),
                task: name.to_string(),
            });
        }

        let task_name: Arc<str> = Arc::from(name);
        let path: Arc<str> = Arc::from(self.resolve_path(output_path).as_str());

        self.index.insert(Arc::clone(&task_name), self.tasks.len());
        self.tasks.push(Task {
            name: Arc::clone(&task_name),
            output_path: output_path.to_string(),
            path: Arc::clone(&path),
            inputs,
            params,
            transform: Box::new(transform),
        });

        debug!(graph = %self.name, task = %task_name, path = %path, "registered task");

        Ok(Reference::new(
            self.id,
            Arc::clone(&self.name),
            task_name,
            path,
        ))
    }

    /// Reference to a previously registered task.
    ///
    /// The handle exposes the task's resolved absolute output path for direct
    /// string use (e.g. wiring a downstream pipeline's CLI), without
    /// requiring the task to have executed.
    pub fn get_task(&self, name: &str) -> Result<Reference> {
        let task = self.task_named(name)?;
        Ok(Reference::new(
            self.id,
            Arc::clone(&self.name),
            Arc::clone(&task.name),
            Arc::clone(&task.path),
        ))
    }

    /// Declare alias → task-name pairs for externally consumed artifacts.
    pub fn set_outputs<I, A, T>(&mut self, mapping: I) -> Result<()>
    where
        I: IntoIterator<Item = (A, T)>,
        A: Into<String>,
        T: Into<String>,
    {
        for (alias, task) in mapping {
            let alias = alias.into();
            let task = task.into();
            if !self.index.contains_key(task.as_str()) {
                return Err(StagedagError::TaskNotFound {
                    graph: self.name.to_string(),
                    task,
                });
            }
            self.outputs.insert(alias, task);
        }
        Ok(())
    }

    /// Resolved output path of the task behind a declared alias.
    pub fn get_output(&self, alias: &str) -> Result<String> {
        let task = self
            .outputs
            .get(alias)
            .ok_or_else(|| StagedagError::OutputNotFound {
                graph: self.name.to_string(),
                output: alias.to_string(),
            })?;
        Ok(self.task_named(task)?.path().to_string())
    }

    pub(crate) fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn task_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn outputs(&self) -> &BTreeMap<String, String> {
        &self.outputs
    }

    pub(crate) fn key_for(&self, name: &str) -> TaskKey {
        TaskKey {
            graph: self.id,
            task: Arc::from(name),
        }
    }

    fn task_named(&self, name: &str) -> Result<&Task> {
        self.index
            .get(name)
            .map(|&idx| &self.tasks[idx])
            .ok_or_else(|| StagedagError::TaskNotFound {
                graph: self.name.to_string(),
                task: name.to_string(),
            })
    }

    fn resolve_path(&self, output_path: &str) -> String {
        format!(
            "{}/{}",
            self.staging_root,
            output_path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("name", &self.name)
            .field("staging_root", &self.staging_root)
            .field("tasks", &self.tasks.len())
            .field("outputs", &self.outputs)
            .finish()
    }
}
