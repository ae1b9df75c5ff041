//! The task registry - per-task runtime state.

use schedsim_core::{ResourceId, TaskId, TaskSpec, TaskStatus};
use std::collections::BTreeMap;

/// Runtime state of one task.
#[derive(Debug, Clone)]
struct TaskState {
    priority: i64,
    required: Vec<ResourceId>,
    remaining: u64,
    status: TaskStatus,
}

/// The sole owner of mutable task state.
///
/// Invariants: `remaining` is non-increasing, and
/// `status == Finished ⇔ remaining == 0` at every point observable from
/// outside a single method call ([`TaskRegistry::consume`] decrements and
/// finishes in one step).
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    tasks: BTreeMap<TaskId, TaskState>,
}

impl TaskRegistry {
    /// Build the registry from task descriptors, ids assigned by 1-based
    /// position. All tasks start as `NotStarted`.
    pub fn new(specs: &[TaskSpec]) -> Self {
        let tasks = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                (
                    TaskId::new(i as u32 + 1),
                    TaskState {
                        priority: spec.priority,
                        required: spec.required.clone(),
                        remaining: spec.burst,
                        status: TaskStatus::NotStarted,
                    },
                )
            })
            .collect();
        Self { tasks }
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task ids in registration order.
    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.keys().copied().collect()
    }

    /// Scheduling priority of a task.
    pub fn priority(&self, tid: TaskId) -> i64 {
        self.tasks[&tid].priority
    }

    /// Required resource sequence of a task.
    pub fn required(&self, tid: TaskId) -> &[ResourceId] {
        &self.tasks[&tid].required
    }

    /// Remaining work units of a task.
    pub fn remaining(&self, tid: TaskId) -> u64 {
        self.tasks[&tid].remaining
    }

    /// Current status of a task.
    pub fn status(&self, tid: TaskId) -> TaskStatus {
        self.tasks[&tid].status
    }

    /// Set the status of a task. `Finished` is only ever set by
    /// [`TaskRegistry::consume`].
    pub fn set_status(&mut self, tid: TaskId, status: TaskStatus) {
        debug_assert!(status != TaskStatus::Finished);
        if let Some(state) = self.tasks.get_mut(&tid) {
            state.status = status;
        }
    }

    /// Mark every task `Ready`. Called once when a run starts.
    pub fn mark_all_ready(&mut self) {
        for state in self.tasks.values_mut() {
            state.status = TaskStatus::Ready;
        }
    }

    /// Execute `units` of work: decrement `remaining` and, when it
    /// reaches zero, set `Finished` in the same step. Returns whether the
    /// task finished.
    pub fn consume(&mut self, tid: TaskId, units: u64) -> bool {
        let state = self
            .tasks
            .get_mut(&tid)
            .unwrap_or_else(|| unreachable!("unknown task {tid}"));
        state.remaining = state.remaining.saturating_sub(units);
        if state.remaining == 0 {
            state.status = TaskStatus::Finished;
            true
        } else {
            false
        }
    }

    /// Whether a task has executed all of its work.
    pub fn is_finished(&self, tid: TaskId) -> bool {
        self.tasks[&tid].remaining == 0
    }

    /// Whether every task is finished.
    pub fn all_finished(&self) -> bool {
        self.tasks.values().all(|state| state.remaining == 0)
    }

    /// Whether any task is currently `Waiting`.
    pub fn any_waiting(&self) -> bool {
        self.tasks
            .values()
            .any(|state| state.status == TaskStatus::Waiting)
    }

    /// Number of tasks that still have work to execute.
    pub fn unfinished_count(&self) -> usize {
        self.tasks
            .values()
            .filter(|state| state.remaining > 0)
            .count()
    }

    /// Per-task `label + id` renderings for snapshots, ascending task id.
    pub fn status_labels(&self) -> Vec<String> {
        self.tasks
            .iter()
            .map(|(tid, state)| format!("{}{}", state.status.label(), tid))
            .collect()
    }
}
