//! Degraded real-concurrency execution mode.
//!
//! Realizes the same task/resource model as the reference engine with
//! one OS thread per task instead of explicit scheduling queues. The
//! resource ledger is serialized behind a mutex and blocked tasks wait
//! on a condition variable that is notified on every release, so there
//! is no fixed-interval polling.
//!
//! This mode trades the reference semantics for true concurrency:
//! completion order is non-deterministic, priorities are ignored, there
//! is no logical clock, and there is no deadlock detection - a task
//! whose requirement can structurally never be satisfied (for example a
//! dangling resource reference) blocks its thread forever. Callers are
//! expected to validate the description first.

#![warn(missing_docs)]

use parking_lot::{Condvar, Mutex};
use schedsim_core::{SimulationSpec, TaskId};
use schedsim_engine::ResourceLedger;
use std::thread;
use tracing::debug;

/// Result of a parallel run.
#[derive(Debug, Clone)]
pub struct ParallelReport {
    /// Task ids in the order their threads completed
    pub completion_order: Vec<TaskId>,
    /// Total work units executed across all tasks
    pub total_work: u64,
}

/// State shared by all task threads, serialized behind one mutex so a
/// multi-resource acquisition can never interleave with another task's.
struct Shared {
    ledger: ResourceLedger,
    completion_order: Vec<TaskId>,
    total_work: u64,
}

/// Execute every task of `spec` on its own thread.
///
/// Each task atomically acquires its whole requirement, holds it for its
/// entire burst (drained in quantum-sized chunks against the shared work
/// counter), then releases and wakes all blocked tasks. Returns once
/// every task thread has finished.
pub fn run_parallel(spec: &SimulationSpec) -> ParallelReport {
    let shared = Mutex::new(Shared {
        ledger: ResourceLedger::new(&spec.resources),
        completion_order: Vec::with_capacity(spec.tasks.len()),
        total_work: 0,
    });
    let released = Condvar::new();
    let quantum = spec.quantum.max(1);

    thread::scope(|scope| {
        let shared = &shared;
        let released = &released;
        for (i, task) in spec.tasks.iter().enumerate() {
            let tid = TaskId::new(i as u32 + 1);
            let required = task.required.clone();
            let burst = task.burst;
            scope.spawn(move || {
                let mut guard = shared.lock();
                while !guard.ledger.acquire_all(tid, &required) {
                    debug!(task = %tid, "blocked, waiting for a release");
                    released.wait(&mut guard);
                }
                drop(guard);

                // Resources stay held for the whole burst; only the work
                // counter needs the lock per chunk.
                let mut remaining = burst;
                while remaining > 0 {
                    let chunk = quantum.min(remaining);
                    remaining -= chunk;
                    shared.lock().total_work += chunk;
                    thread::yield_now();
                }

                let mut guard = shared.lock();
                guard.ledger.release_all(tid, &required);
                guard.completion_order.push(tid);
                debug!(task = %tid, "finished");
                released.notify_all();
            });
        }
    });

    let shared = shared.into_inner();
    ParallelReport {
        completion_order: shared.completion_order,
        total_work: shared.total_work,
    }
}
