//! The execution loop.

use crate::policy::{Lcfs, Mlq, SchedulingPolicy, StepContext, StepOutcome};
use crate::{History, ResourceLedger, TaskRegistry};
use schedsim_core::{Policy, SimulationSpec, Time};
use serde::Serialize;
use tracing::{debug, info};

/// The simulated clock. Advances only by executed work units, never by
/// waiting or polling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalClock(Time);

impl LogicalClock {
    /// Current logical time.
    pub fn now(&self) -> Time {
        self.0
    }

    /// Advance by `units` of executed work.
    pub fn advance(&mut self, units: Time) {
        self.0 += units;
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Every task finished at this logical time
    Completed(Time),
    /// At least one unfinished task can never make progress
    Deadlock,
}

/// The result of a run: the outcome plus the full snapshot history.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Completion time or deadlock verdict
    pub outcome: Outcome,
    /// Ordered snapshot sequence accumulated up to the end of the run
    pub history: History,
}

/// The simulation engine.
///
/// Drives repeated select → acquire → run-slice → release steps under
/// the configured policy until every task is finished or no unfinished
/// task can make progress. Single-threaded and cooperative: `Waiting` is
/// a modeled status, not a blocked thread, and `run` is deterministic
/// for identical input.
pub struct Engine {
    ledger: ResourceLedger,
    registry: TaskRegistry,
    policy: Box<dyn SchedulingPolicy>,
    clock: LogicalClock,
    history: History,
}

impl Engine {
    /// Construct an engine from a structurally-valid description.
    ///
    /// Dangling resource references in task requirements are permitted;
    /// they surface as ordinary acquisition failures during the run.
    pub fn new(spec: &SimulationSpec) -> Self {
        let policy: Box<dyn SchedulingPolicy> = match spec.policy {
            Policy::Lcfs => Box::new(Lcfs::new()),
            Policy::Mlq => Box::new(Mlq::new(spec.quantum)),
        };
        Self {
            ledger: ResourceLedger::new(&spec.resources),
            registry: TaskRegistry::new(&spec.tasks),
            policy,
            clock: LogicalClock::default(),
            history: History::new(),
        }
    }

    /// Run the simulation to its verdict.
    ///
    /// Terminates on every input: each step either executes at least one
    /// work unit of a finite total or lengthens a blocked streak bounded
    /// by the unfinished task count. Resources are never retained across
    /// a step boundary, so the ledger can only change through a
    /// successful dispatch; a full round of failed dispatches therefore
    /// proves the system stationary and the run deadlocked.
    pub fn run(mut self) -> RunReport {
        self.registry.mark_all_ready();
        self.policy.seed(&self.registry);
        self.history
            .record(self.clock.now(), &self.ledger, &self.registry);

        let mut blocked_streak = 0usize;
        let outcome = loop {
            if self.registry.all_finished() {
                self.history
                    .record(self.clock.now(), &self.ledger, &self.registry);
                break Outcome::Completed(self.clock.now());
            }

            let mut cx = StepContext {
                ledger: &mut self.ledger,
                registry: &mut self.registry,
                clock: &mut self.clock,
                history: &mut self.history,
            };
            let step = self.policy.step(&mut cx);
            debug_assert!(self.ledger.capacity_invariant_holds());

            match step {
                StepOutcome::Dispatched => blocked_streak = 0,
                StepOutcome::Blocked => {
                    blocked_streak += 1;
                    if blocked_streak >= self.registry.unfinished_count() {
                        debug!(blocked_streak, "no unfinished task can progress");
                        break Outcome::Deadlock;
                    }
                }
                StepOutcome::Stalled => {
                    if self.registry.any_waiting() {
                        break Outcome::Deadlock;
                    }
                    self.history
                        .record(self.clock.now(), &self.ledger, &self.registry);
                    break Outcome::Completed(self.clock.now());
                }
            }
        };

        match outcome {
            Outcome::Completed(time) => info!(time, "run completed"),
            Outcome::Deadlock => info!(time = self.clock.now(), "run deadlocked"),
        }
        RunReport {
            outcome,
            history: self.history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedsim_core::{ResourceId, ResourceSpec, TaskSpec};

    fn mlq_spec(resources: Vec<ResourceSpec>, tasks: Vec<TaskSpec>, quantum: u64) -> SimulationSpec {
        SimulationSpec {
            resources,
            tasks,
            policy: Policy::Mlq,
            quantum,
        }
    }

    fn lcfs_spec(resources: Vec<ResourceSpec>, tasks: Vec<TaskSpec>) -> SimulationSpec {
        SimulationSpec {
            resources,
            tasks,
            policy: Policy::Lcfs,
            quantum: 50,
        }
    }

    fn rid(n: u32) -> ResourceId {
        ResourceId::new(n)
    }

    #[test]
    fn mlq_single_task_runs_in_quantum_steps() {
        let spec = mlq_spec(vec![], vec![TaskSpec::new("A", "", 1, 100, vec![])], 50);
        let report = Engine::new(&spec).run();

        assert_eq!(report.outcome, Outcome::Completed(100));
        // Initial, two quantum dispatches, final.
        let times: Vec<u64> = report.history.snapshots().iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0, 50, 100, 100]);
        assert_eq!(report.history.snapshots()[1].tasks, vec!["R1"]);
        assert_eq!(report.history.snapshots()[3].tasks, vec!["F1"]);
    }

    #[test]
    fn mlq_equal_priority_tasks_interleave_on_shared_resource() {
        // A (burst 100) and B (burst 60) share capacity-1 R1; quantum 50.
        // Resources are released at every quantum boundary, so the two
        // tasks alternate: A@50, B@100, A@150 (A finishes), B@160.
        let spec = mlq_spec(
            vec![ResourceSpec::new("R1", 1)],
            vec![
                TaskSpec::new("A", "", 1, 100, vec![rid(1)]),
                TaskSpec::new("B", "", 1, 60, vec![rid(1)]),
            ],
            50,
        );
        let report = Engine::new(&spec).run();

        assert_eq!(report.outcome, Outcome::Completed(160));
        let snapshots = report.history.snapshots();
        let times: Vec<u64> = snapshots.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0, 50, 100, 150, 160, 160]);

        assert_eq!(snapshots[1].tasks, vec!["R1", "READY2"]);
        assert_eq!(snapshots[1].resources, vec!["1"]);
        assert_eq!(snapshots[2].tasks, vec!["READY1", "R2"]);
        assert_eq!(snapshots[2].resources, vec!["2"]);
        assert_eq!(snapshots[3].tasks, vec!["R1", "READY2"]);
        assert_eq!(snapshots[4].tasks, vec!["F1", "R2"]);
        assert_eq!(snapshots[5].tasks, vec!["F1", "F2"]);
        assert_eq!(snapshots[5].resources, vec!["0"]);
    }

    #[test]
    fn mlq_runs_higher_priority_level_to_completion_first() {
        let spec = mlq_spec(
            vec![],
            vec![
                TaskSpec::new("low", "", 1, 60, vec![]),
                TaskSpec::new("high", "", 9, 100, vec![]),
            ],
            50,
        );
        let report = Engine::new(&spec).run();

        assert_eq!(report.outcome, Outcome::Completed(160));
        // high runs at 50 and 100, low at 150 and 160.
        let snapshots = report.history.snapshots();
        assert_eq!(snapshots[1].tasks, vec!["READY1", "R2"]);
        assert_eq!(snapshots[2].tasks, vec!["READY1", "R2"]);
        assert_eq!(snapshots[3].tasks, vec!["R1", "F2"]);
        assert_eq!(snapshots[4].tasks, vec!["R1", "F2"]);
    }

    #[test]
    fn lcfs_completes_in_reverse_registration_order() {
        let spec = lcfs_spec(
            vec![],
            vec![
                TaskSpec::new("A", "", 1, 30, vec![]),
                TaskSpec::new("B", "", 1, 20, vec![]),
                TaskSpec::new("C", "", 1, 10, vec![]),
            ],
        );
        let report = Engine::new(&spec).run();

        assert_eq!(report.outcome, Outcome::Completed(60));
        let snapshots = report.history.snapshots();
        // C at 10, B at 30, A at 60.
        assert_eq!(snapshots[1].time, 10);
        assert_eq!(snapshots[1].tasks, vec!["READY1", "READY2", "R3"]);
        assert_eq!(snapshots[2].time, 30);
        assert_eq!(snapshots[2].tasks, vec!["READY1", "R2", "F3"]);
        assert_eq!(snapshots[3].time, 60);
        assert_eq!(snapshots[3].tasks, vec!["R1", "F2", "F3"]);
    }

    #[test]
    fn lcfs_non_preemptive_holds_resources_for_whole_burst() {
        let spec = lcfs_spec(
            vec![ResourceSpec::new("R1", 1)],
            vec![
                TaskSpec::new("A", "", 1, 100, vec![rid(1)]),
                TaskSpec::new("B", "", 1, 60, vec![rid(1)]),
            ],
        );
        let report = Engine::new(&spec).run();

        assert_eq!(report.outcome, Outcome::Completed(160));
        let snapshots = report.history.snapshots();
        // B (top of stack) runs its full burst first, then A.
        assert_eq!(snapshots[1].time, 60);
        assert_eq!(snapshots[1].resources, vec!["2"]);
        assert_eq!(snapshots[2].time, 160);
        assert_eq!(snapshots[2].resources, vec!["1"]);
    }

    #[test]
    fn dangling_reference_deadlocks_when_sole_remaining() {
        let spec = mlq_spec(
            vec![ResourceSpec::new("R1", 1)],
            vec![TaskSpec::new("A", "", 1, 10, vec![rid(7)])],
            50,
        );
        let report = Engine::new(&spec).run();
        assert_eq!(report.outcome, Outcome::Deadlock);
        // Only the initial snapshot; MLQ records nothing on a failed
        // acquisition.
        assert_eq!(report.history.len(), 1);
    }

    #[test]
    fn dangling_reference_lets_other_tasks_finish_around_it() {
        let spec = mlq_spec(
            vec![ResourceSpec::new("R1", 1)],
            vec![
                TaskSpec::new("stuck", "", 1, 10, vec![rid(9)]),
                TaskSpec::new("fine", "", 1, 100, vec![rid(1)]),
            ],
            50,
        );
        let report = Engine::new(&spec).run();

        assert_eq!(report.outcome, Outcome::Deadlock);
        // "fine" executed both of its quanta before the verdict.
        let last = report.history.snapshots().last().unwrap();
        assert_eq!(last.time, 100);
        assert_eq!(last.tasks, vec!["W1", "R2"]);
    }

    #[test]
    fn duplicate_capacity_one_requirement_deadlocks() {
        // The atomic request needs two tokens of a capacity-1 resource,
        // so it fails even with no competition.
        let spec = lcfs_spec(
            vec![ResourceSpec::new("R1", 1)],
            vec![TaskSpec::new("A", "", 1, 10, vec![rid(1), rid(1)])],
        );
        let report = Engine::new(&spec).run();

        assert_eq!(report.outcome, Outcome::Deadlock);
        // Initial snapshot plus the waiting snapshot LCFS records.
        assert_eq!(report.history.len(), 2);
        assert_eq!(report.history.snapshots()[1].tasks, vec!["W1"]);
        assert_eq!(report.history.snapshots()[1].resources, vec!["0"]);
    }

    #[test]
    fn lcfs_blocked_top_deadlocks_with_tasks_beneath() {
        // Non-preemptive LCFS never runs past a blocked stack top, so the
        // tasks beneath the stuck one cannot proceed.
        let spec = lcfs_spec(
            vec![ResourceSpec::new("R1", 1)],
            vec![
                TaskSpec::new("beneath", "", 1, 10, vec![]),
                TaskSpec::new("stuck", "", 1, 10, vec![rid(4)]),
            ],
        );
        let report = Engine::new(&spec).run();
        assert_eq!(report.outcome, Outcome::Deadlock);
        let last = report.history.snapshots().last().unwrap();
        assert_eq!(last.tasks, vec!["READY1", "W2"]);
    }

    #[test]
    fn no_tasks_completes_immediately() {
        let spec = mlq_spec(vec![ResourceSpec::new("R1", 1)], vec![], 50);
        let report = Engine::new(&spec).run();
        assert_eq!(report.outcome, Outcome::Completed(0));
        assert_eq!(report.history.len(), 2);
    }

    #[test]
    fn runs_are_deterministic() {
        let spec = mlq_spec(
            vec![ResourceSpec::new("R1", 1), ResourceSpec::new("R2", 2)],
            vec![
                TaskSpec::new("A", "", 2, 100, vec![rid(1), rid(2)]),
                TaskSpec::new("B", "", 1, 60, vec![rid(2)]),
                TaskSpec::new("C", "", 2, 30, vec![]),
            ],
            25,
        );
        let first = Engine::new(&spec).run();
        let second = Engine::new(&spec).run();

        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.history.snapshots(), second.history.snapshots());
    }

    #[test]
    fn snapshot_resource_invariant_holds_throughout() {
        let spec = mlq_spec(
            vec![ResourceSpec::new("R1", 2)],
            vec![
                TaskSpec::new("A", "", 1, 40, vec![rid(1)]),
                TaskSpec::new("B", "", 1, 40, vec![rid(1), rid(1)]),
            ],
            20,
        );
        let report = Engine::new(&spec).run();
        assert_eq!(report.outcome, Outcome::Completed(80));

        // Owner count can never exceed the configured capacity.
        for snapshot in report.history.snapshots() {
            let owners = &snapshot.resources[0];
            let count = if owners == "0" {
                0
            } else {
                owners.split(',').count()
            };
            assert!(count <= 2, "snapshot at {} has {count} owners", snapshot.time);
        }
    }
}
