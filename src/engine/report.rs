// src/engine/report.rs

//! Per-task status and the run result.

use std::fmt;

use tracing::{info, warn};

use crate::errors::StagedagError;

/// State of a task over the course of one run.
///
/// `Pending → (Skipped | Running → (Done | Failed))`, with `Blocked` for
/// dependents of a failed ancestor. Terminal states are `Skipped`, `Done`,
/// `Failed` and `Blocked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Skipped,
    Running,
    Done,
    Failed,
    Blocked,
}

impl TaskStatus {
    /// Whether dependents of a task in this state may proceed.
    pub fn is_complete(self) -> bool {
        matches!(self, TaskStatus::Skipped | TaskStatus::Done)
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, TaskStatus::Pending | TaskStatus::Running)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Skipped => "skipped",
            TaskStatus::Running => "running",
            TaskStatus::Done => "done",
            TaskStatus::Failed => "failed",
            TaskStatus::Blocked => "blocked",
        };
        f.write_str(label)
    }
}

/// Outcome of one closure member.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub graph: String,
    pub task: String,
    pub status: TaskStatus,
}

/// Result of one engine run; records are in execution order.
#[derive(Debug, Default)]
pub struct RunReport {
    records: Vec<TaskRecord>,
    failures: Vec<StagedagError>,
}

impl RunReport {
    pub(crate) fn record(&mut self, graph: &str, task: &str, status: TaskStatus) {
        self.records.push(TaskRecord {
            graph: graph.to_string(),
            task: task.to_string(),
            status,
        });
    }

    pub(crate) fn record_failure(&mut self, error: StagedagError) {
        self.failures.push(error);
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    /// The wrapped invocation errors, one per failed task.
    pub fn failures(&self) -> &[StagedagError] {
        &self.failures
    }

    /// Status of the first record matching the bare task name.
    pub fn status_of(&self, task: &str) -> Option<TaskStatus> {
        self.records
            .iter()
            .find(|record| record.task == task)
            .map(|record| record.status)
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.records
            .iter()
            .filter(|record| record.status == status)
            .count()
    }

    /// A run succeeds when every closure member was skipped or done.
    pub fn is_success(&self) -> bool {
        self.count(TaskStatus::Failed) == 0 && self.count(TaskStatus::Blocked) == 0
    }

    /// Non-zero on any failed or blocked task, for thin CLI wrappers.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    /// Log a human-oriented summary of the run.
    pub fn log_summary(&self) {
        info!(
            done = self.count(TaskStatus::Done),
            skipped = self.count(TaskStatus::Skipped),
            failed = self.count(TaskStatus::Failed),
            blocked = self.count(TaskStatus::Blocked),
            "run finished"
        );

        for failure in &self.failures {
            warn!("{failure}");
        }
        for record in self
            .records
            .iter()
            .filter(|record| record.status == TaskStatus::Blocked)
        {
            warn!(
                graph = %record.graph,
                task = %record.task,
                "not run: blocked by a failed dependency"
            );
        }
    }
}
