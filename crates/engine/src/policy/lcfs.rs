//! Last-come-first-served, non-preemptive.

use super::{SchedulingPolicy, StepContext, StepOutcome};
use crate::TaskRegistry;
use schedsim_core::{TaskId, TaskStatus};
use tracing::debug;

/// A strict LIFO stack of task ids.
#[derive(Debug, Default)]
struct TaskStack {
    entries: Vec<TaskId>,
}

impl TaskStack {
    fn push(&mut self, tid: TaskId) {
        self.entries.push(tid);
    }

    /// Peek the top runnable task, lazily popping finished entries.
    fn top(&mut self, registry: &TaskRegistry) -> Option<TaskId> {
        while let Some(&top) = self.entries.last() {
            if registry.is_finished(top) {
                self.entries.pop();
            } else {
                return Some(top);
            }
        }
        None
    }

    fn pop(&mut self) {
        self.entries.pop();
    }
}

/// Last-come-first-served scheduler.
///
/// Tasks are pushed in registration order, so the most recently
/// registered task runs first and - absent resource contention -
/// completion order is the reverse of registration order. Dispatch is
/// non-preemptive: a task that acquires its resources executes its whole
/// remaining burst in one indivisible step. A blocked task stays on top
/// of the stack and is retried in place on the next step.
#[derive(Debug, Default)]
pub struct Lcfs {
    stack: TaskStack,
}

impl Lcfs {
    /// Create an LCFS policy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchedulingPolicy for Lcfs {
    fn seed(&mut self, registry: &TaskRegistry) {
        for tid in registry.ids() {
            self.stack.push(tid);
        }
    }

    fn step(&mut self, cx: &mut StepContext<'_>) -> StepOutcome {
        let Some(tid) = self.stack.top(cx.registry) else {
            return StepOutcome::Stalled;
        };

        let required = cx.registry.required(tid).to_vec();
        if !cx.ledger.acquire_all(tid, &required) {
            debug!(task = %tid, "acquisition failed, retrying in place");
            cx.registry.set_status(tid, TaskStatus::Waiting);
            cx.history.record(cx.clock.now(), cx.ledger, cx.registry);
            return StepOutcome::Blocked;
        }

        cx.registry.set_status(tid, TaskStatus::Running);
        let slice = cx.registry.remaining(tid);
        cx.clock.advance(slice);
        debug!(task = %tid, slice, time = cx.clock.now(), "dispatched to completion");

        cx.history.record(cx.clock.now(), cx.ledger, cx.registry);

        cx.ledger.release_all(tid, &required);
        cx.registry.consume(tid, slice);
        self.stack.pop();
        StepOutcome::Dispatched
    }
}
