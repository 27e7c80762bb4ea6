// src/store/mock.rs

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use super::ArtifactStore;

/// In-memory artifact store for tests.
///
/// Clones share the same presence set, so a test can hand one clone to the
/// engine and keep another to seed pre-existing artifacts or inspect what the
/// run produced; canned transforms "persist" their output by calling
/// [`MockStore::put`].
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    present: Arc<Mutex<BTreeSet<String>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an artifact as present.
    pub fn put(&self, path: impl Into<String>) {
        self.present.lock().unwrap().insert(path.into());
    }

    /// Remove an artifact, as if it had been deleted from staging.
    pub fn remove(&self, path: &str) {
        self.present.lock().unwrap().remove(path);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.present.lock().unwrap().contains(path)
    }

    /// All present artifact paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.present.lock().unwrap().iter().cloned().collect()
    }
}

impl ArtifactStore for MockStore {
    fn exists(&self, path: &str) -> bool {
        self.contains(path)
    }
}
