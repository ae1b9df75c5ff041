//! Task model - the unit of scheduled work in SchedSim.

use crate::id::ResourceId;
use serde::{Deserialize, Serialize};

/// Immutable description of a task to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Display name
    pub name: String,

    /// Group label (informational only, carried through to the report)
    pub group: String,

    /// Scheduling priority; larger values are more urgent under MLQ
    pub priority: i64,

    /// Total work units the task must execute
    pub burst: u64,

    /// Resources the task must hold while running, in request order.
    /// Duplicates are permitted and each entry consumes one token.
    pub required: Vec<ResourceId>,
}

impl TaskSpec {
    /// Create a new task descriptor.
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        priority: i64,
        burst: u64,
        required: Vec<ResourceId>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            priority,
            burst,
            required,
        }
    }
}

/// Scheduling status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Registered but the run has not started
    NotStarted,
    /// Eligible for selection
    Ready,
    /// Last acquisition attempt failed; will be retried
    Waiting,
    /// Currently executing a slice
    Running,
    /// All work executed
    Finished,
}

impl TaskStatus {
    /// Short label used in snapshots and the report table.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "N",
            TaskStatus::Ready => "READY",
            TaskStatus::Waiting => "W",
            TaskStatus::Running => "R",
            TaskStatus::Finished => "F",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_match_report_format() {
        assert_eq!(TaskStatus::NotStarted.label(), "N");
        assert_eq!(TaskStatus::Ready.label(), "READY");
        assert_eq!(TaskStatus::Waiting.label(), "W");
        assert_eq!(TaskStatus::Running.label(), "R");
        assert_eq!(TaskStatus::Finished.label(), "F");
    }
}
