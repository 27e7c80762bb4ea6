// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! Definition errors (duplicates, unknown names, cycles) are fail-fast and
//! prevent any task from running. `TaskFailed` wraps whatever the transform
//! raised; the engine records it in the run report instead of aborting
//! unrelated branches.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StagedagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("task '{task}' is already registered in graph '{graph}'")]
    DuplicateTask { graph: String, task: String },

    #[error("unknown task '{task}' in graph '{graph}'")]
    TaskNotFound { graph: String, task: String },

    #[error("unknown output '{output}' in graph '{graph}'")]
    OutputNotFound { graph: String, output: String },

    #[error("no task or declared output named '{0}' in this run")]
    UnknownTarget(String),

    #[error("target '{target}' is ambiguous; it matches {matches:?}")]
    AmbiguousTarget { target: String, matches: Vec<String> },

    #[error("cycle detected in task graph: {0}")]
    CycleDetected(String),

    #[error("reference to task '{0}' consumed before its output was recorded; this is a scheduling bug, not a configuration error")]
    UnresolvedReference(String),

    #[error("task '{task}' failed: {source}")]
    TaskFailed {
        task: String,
        source: anyhow::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, StagedagError>;
