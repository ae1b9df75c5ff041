//! Multi-level queue round robin, preemptive.

use super::{SchedulingPolicy, StepContext, StepOutcome};
use crate::TaskRegistry;
use schedsim_core::{TaskId, TaskStatus};
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

/// One FIFO queue per distinct priority value, scanned highest first.
#[derive(Debug, Default)]
struct PriorityQueues {
    levels: BTreeMap<i64, VecDeque<TaskId>>,
}

impl PriorityQueues {
    fn push_back(&mut self, priority: i64, tid: TaskId) {
        self.levels.entry(priority).or_default().push_back(tid);
    }

    /// Pop the next runnable task: scan levels from highest to lowest,
    /// lazily discarding finished queue heads without re-queueing them.
    fn select(&mut self, registry: &TaskRegistry) -> Option<TaskId> {
        for queue in self.levels.values_mut().rev() {
            while let Some(&head) = queue.front() {
                if registry.is_finished(head) {
                    queue.pop_front();
                } else {
                    break;
                }
            }
            if let Some(tid) = queue.pop_front() {
                return Some(tid);
            }
        }
        None
    }
}

/// Multi-level queue scheduler.
///
/// Every priority level shares one fixed quantum. A task that fails its
/// acquisition goes to the back of its own level, so it is retried
/// interleaved with its peers rather than blocking the queue head.
/// Resources are never retained across a quantum boundary.
#[derive(Debug)]
pub struct Mlq {
    quantum: u64,
    queues: PriorityQueues,
}

impl Mlq {
    /// Create an MLQ policy with the given quantum (work units, ≥ 1).
    pub fn new(quantum: u64) -> Self {
        Self {
            quantum,
            queues: PriorityQueues::default(),
        }
    }
}

impl SchedulingPolicy for Mlq {
    fn seed(&mut self, registry: &TaskRegistry) {
        for tid in registry.ids() {
            self.queues.push_back(registry.priority(tid), tid);
        }
    }

    fn step(&mut self, cx: &mut StepContext<'_>) -> StepOutcome {
        let Some(tid) = self.queues.select(cx.registry) else {
            return StepOutcome::Stalled;
        };

        let required = cx.registry.required(tid).to_vec();
        if !cx.ledger.acquire_all(tid, &required) {
            debug!(task = %tid, "acquisition failed, re-queued");
            cx.registry.set_status(tid, TaskStatus::Waiting);
            self.queues.push_back(cx.registry.priority(tid), tid);
            return StepOutcome::Blocked;
        }

        cx.registry.set_status(tid, TaskStatus::Running);
        let slice = self.quantum.min(cx.registry.remaining(tid));
        cx.clock.advance(slice);
        debug!(task = %tid, slice, time = cx.clock.now(), "dispatched");

        // Snapshot while the resources are still held and before the
        // remaining-work counter moves.
        cx.history.record(cx.clock.now(), cx.ledger, cx.registry);

        cx.ledger.release_all(tid, &required);
        if !cx.registry.consume(tid, slice) {
            cx.registry.set_status(tid, TaskStatus::Ready);
            self.queues.push_back(cx.registry.priority(tid), tid);
        }
        StepOutcome::Dispatched
    }
}
