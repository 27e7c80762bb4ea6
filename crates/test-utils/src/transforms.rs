use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use stagedag::graph::{Invocation, Transform};
use stagedag::store::MockStore;

/// Shared invocation log: the labels of executed transforms, in order.
pub type InvocationLog = Arc<Mutex<Vec<String>>>;

/// Fresh shared invocation log.
pub fn invocation_log() -> InvocationLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Snapshot of the log contents.
pub fn logged(log: &InvocationLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// A transform that:
/// - appends its label to a shared invocation log
/// - "persists" its artifact by marking the output path present in a
///   [`MockStore`].
#[derive(Debug, Clone)]
pub struct RecordingTransform {
    label: String,
    store: MockStore,
    log: InvocationLog,
}

impl RecordingTransform {
    pub fn new(label: &str, store: &MockStore, log: &InvocationLog) -> Self {
        Self {
            label: label.to_string(),
            store: store.clone(),
            log: Arc::clone(log),
        }
    }
}

impl Transform for RecordingTransform {
    fn apply(&self, call: &Invocation<'_>) -> anyhow::Result<()> {
        self.log.lock().unwrap().push(self.label.clone());
        self.store.put(call.output_path);
        Ok(())
    }
}

/// A transform that always fails with the given message, without persisting
/// anything.
#[derive(Debug, Clone)]
pub struct FailingTransform {
    message: String,
}

impl FailingTransform {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl Transform for FailingTransform {
    fn apply(&self, _call: &Invocation<'_>) -> anyhow::Result<()> {
        Err(anyhow!("{}", self.message))
    }
}
