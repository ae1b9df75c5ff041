//! Snapshot of simulation state at one instant of logical time.

use crate::Time;
use serde::{Deserialize, Serialize};

/// An immutable record of the full simulation state at one point in time.
///
/// Snapshots render state as the strings the report table prints: for
/// each resource the comma-joined owner task ids (or `"0"` when free),
/// and for each task its status label followed by its id (`"READY1"`,
/// `"R2"`, `"W3"`, `"F1"`). Both vectors are ordered by ascending id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Logical time the snapshot was taken at
    pub time: Time,

    /// Per-resource owner rendering, ascending resource id
    pub resources: Vec<String>,

    /// Per-task status-plus-identity label, ascending task id
    pub tasks: Vec<String>,
}

impl Snapshot {
    /// Create a snapshot record.
    pub fn new(time: Time, resources: Vec<String>, tasks: Vec<String>) -> Self {
        Self {
            time,
            resources,
            tasks,
        }
    }
}
