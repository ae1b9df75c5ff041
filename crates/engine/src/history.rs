//! Append-only execution history.

use crate::{ResourceLedger, TaskRegistry};
use schedsim_core::{Snapshot, Time};
use serde::Serialize;

/// The ordered, write-once sequence of snapshots for one run.
///
/// Only ever appended to; entries are never reordered, mutated, or
/// deduplicated. The engine itself never reads its own history - it
/// exists solely for the external report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct History {
    snapshots: Vec<Snapshot>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot of the current ledger and registry state.
    pub fn record(&mut self, time: Time, ledger: &ResourceLedger, registry: &TaskRegistry) {
        self.snapshots
            .push(Snapshot::new(time, ledger.status(), registry.status_labels()));
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedsim_core::{ResourceSpec, TaskSpec};

    #[test]
    fn record_appends_in_order() {
        let ledger = ResourceLedger::new(&[ResourceSpec::new("Printer", 1)]);
        let mut registry = TaskRegistry::new(&[TaskSpec::new("A", "", 1, 10, vec![])]);
        let mut history = History::new();

        history.record(0, &ledger, &registry);
        registry.mark_all_ready();
        history.record(5, &ledger, &registry);

        assert_eq!(history.len(), 2);
        assert_eq!(history.snapshots()[0].time, 0);
        assert_eq!(history.snapshots()[0].tasks, vec!["N1"]);
        assert_eq!(history.snapshots()[1].time, 5);
        assert_eq!(history.snapshots()[1].tasks, vec!["READY1"]);
    }
}
