// src/graph/task.rs

//! Declared inputs, the transform contract, and registered tasks.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::graph::reference::Reference;

/// A declared task input, before resolution.
#[derive(Debug, Clone)]
pub enum Input {
    /// A literal value, passed through to the transform unchanged.
    Literal(String),
    /// A list of literal values, passed through unchanged.
    List(Vec<String>),
    /// The output artifact of another task, by handle.
    Upstream(Reference),
    /// The output artifact of a task in the same graph, by name.
    ///
    /// Looked up when the execution plan is built, so the named task may be
    /// registered after this one.
    UpstreamNamed(String),
}

/// Input map for a task declaration.
///
/// Keys are the keyword-argument names the transform will receive. The map is
/// ordered so declarations and diagnostics are deterministic.
#[derive(Debug, Clone, Default)]
pub struct Inputs(BTreeMap<String, Input>);

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a literal argument.
    pub fn literal(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), Input::Literal(value.into()));
        self
    }

    /// Add a list of literal values.
    pub fn list<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.0.insert(key.to_string(), Input::List(values));
        self
    }

    /// Add a dependency on another task's output artifact.
    pub fn upstream(mut self, key: &str, dep: &Reference) -> Self {
        self.0.insert(key.to_string(), Input::Upstream(dep.clone()));
        self
    }

    /// Add a dependency on a task in the same graph, by name.
    ///
    /// The named task does not have to be registered yet; it is looked up
    /// when the execution plan is built.
    pub fn upstream_named(mut self, key: &str, task: &str) -> Self {
        self.0
            .insert(key.to_string(), Input::UpstreamNamed(task.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Input)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Literal, non-path keyword parameters forwarded to the transform verbatim.
#[derive(Debug, Clone, Default)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A resolved argument as seen by a transform.
///
/// Upstream references have already been replaced by the concrete output
/// path of their target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Value(String),
    Values(Vec<String>),
}

impl Arg {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Value(v) => Some(v),
            Arg::Values(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Arg::Value(_) => None,
            Arg::Values(vs) => Some(vs),
        }
    }
}

/// Everything a transform receives for one invocation.
#[derive(Debug)]
pub struct Invocation<'a> {
    /// Resolved keyword arguments, keyed by the declared input names.
    pub args: BTreeMap<String, Arg>,
    /// Literal parameters, forwarded verbatim.
    pub params: &'a Params,
    /// Absolute path the transform must persist its artifact at.
    pub output_path: &'a str,
}

impl Invocation<'_> {
    pub fn arg(&self, key: &str) -> Option<&Arg> {
        self.args.get(key)
    }

    /// Scalar argument value (a literal or a resolved upstream path).
    pub fn value(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(Arg::as_str)
    }
}

/// Capability contract for a task's transformation.
///
/// The orchestrator does not interpret the work: given the resolved
/// arguments, the implementation computes one artifact and persists it at
/// `call.output_path` (typically by dispatching a job to an external
/// distributed engine and blocking until it returns). Implementations are
/// `Send + Sync` so independent branches can later be dispatched from worker
/// threads.
///
/// Plain closures work too:
///
/// ```
/// use stagedag::graph::Invocation;
///
/// let transform = |call: &Invocation<'_>| -> anyhow::Result<()> {
///     let _ = call.output_path;
///     Ok(())
/// };
/// # let _ = &transform as &dyn stagedag::graph::Transform;
/// ```
pub trait Transform: Send + Sync {
    fn apply(&self, call: &Invocation<'_>) -> anyhow::Result<()>;
}

impl<F> Transform for F
where
    F: Fn(&Invocation<'_>) -> anyhow::Result<()> + Send + Sync,
{
    fn apply(&self, call: &Invocation<'_>) -> anyhow::Result<()> {
        self(call)
    }
}

/// A registered task. Immutable after registration.
pub struct Task {
    pub(crate) name: Arc<str>,
    pub(crate) output_path: String,
    pub(crate) path: Arc<str>,
    pub(crate) inputs: Inputs,
    pub(crate) params: Params,
    pub(crate) transform: Box<dyn Transform>,
}

impl Task {
    /// Task name, unique within its owning graph.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared output path, relative to the staging root.
    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    /// Absolute output path under the staging root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub(crate) fn params(&self) -> &Params {
        &self.params
    }

    pub(crate) fn transform(&self) -> &dyn Transform {
        self.transform.as_ref()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("inputs", &self.inputs)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
