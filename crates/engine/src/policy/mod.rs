//! Scheduling policies.
//!
//! Both policies share the acquire/run-slice/release protocol and differ
//! only in task selection and preemption. They are driven one step at a
//! time by the execution loop through the [`SchedulingPolicy`] trait.

mod lcfs;
mod mlq;

pub use lcfs::Lcfs;
pub use mlq::Mlq;

use crate::engine::LogicalClock;
use crate::{History, ResourceLedger, TaskRegistry};

/// Mutable engine state handed to a policy for one step.
///
/// The ledger, registry, clock, and history are fields of the execution
/// loop, never globals; independent runs cannot interfere.
pub struct StepContext<'a> {
    /// Resource token pool
    pub ledger: &'a mut ResourceLedger,
    /// Per-task runtime state
    pub registry: &'a mut TaskRegistry,
    /// Logical clock, advanced only by executed work
    pub clock: &'a mut LogicalClock,
    /// Append-only snapshot log
    pub history: &'a mut History,
}

/// What a single scheduling step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A task ran a slice (and possibly finished)
    Dispatched,
    /// The selected task failed to acquire its resources
    Blocked,
    /// No task was selectable
    Stalled,
}

/// A scheduling policy: selects tasks and drives their slices.
pub trait SchedulingPolicy {
    /// Populate the policy's task container. Called exactly once, after
    /// every task has been marked `Ready`, with tasks in registration
    /// order.
    fn seed(&mut self, registry: &TaskRegistry);

    /// Execute one scheduling step: select a task, attempt acquisition,
    /// and on success run a slice and release.
    fn step(&mut self, cx: &mut StepContext<'_>) -> StepOutcome;
}
