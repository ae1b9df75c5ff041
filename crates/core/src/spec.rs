//! The simulation description consumed by the engine.

use crate::{ResourceSpec, TaskSpec};
use serde::{Deserialize, Serialize};

/// Scheduling policy selector.
///
/// The numeric values match the input format's `PA` parameter:
/// `1` = LCFS, `2` = MLQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// Last-come-first-served, non-preemptive
    Lcfs,
    /// Multi-level queue round robin, preemptive
    Mlq,
}

impl Policy {
    /// Map the input format's numeric selector.
    pub fn from_selector(selector: u32) -> Option<Self> {
        match selector {
            1 => Some(Policy::Lcfs),
            2 => Some(Policy::Mlq),
            _ => None,
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Policy::Lcfs => f.write_str("LCFS"),
            Policy::Mlq => f.write_str("MLQ"),
        }
    }
}

/// A structurally-validated, in-memory simulation description.
///
/// Resource and task identities are assigned by 1-based position in the
/// two lists. A `required` entry may reference an id beyond the resource
/// list; that is not a structural error — the engine treats it as an
/// acquisition that can never succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSpec {
    /// Resources, id = 1-based position
    pub resources: Vec<ResourceSpec>,

    /// Tasks, id = 1-based position
    pub tasks: Vec<TaskSpec>,

    /// Active scheduling policy
    pub policy: Policy,

    /// Quantum in work units (used only by MLQ), at least 1
    pub quantum: u64,
}

/// Structural problems in a simulation description.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// Resource with a zero token count
    #[error("resource {index} ({name}) has zero capacity")]
    ZeroCapacity {
        /// 1-based resource position
        index: usize,
        /// Resource display name
        name: String,
    },

    /// Task with no work to execute
    #[error("task {index} ({name}) has zero burst")]
    ZeroBurst {
        /// 1-based task position
        index: usize,
        /// Task display name
        name: String,
    },

    /// Quantum of zero would make MLQ unable to advance the clock
    #[error("quantum must be at least 1")]
    ZeroQuantum,
}

impl SimulationSpec {
    /// Check the structural invariants the engine assumes.
    ///
    /// Dangling resource references are deliberately not checked here;
    /// see [`SimulationSpec::dangling_references`].
    pub fn validate(&self) -> Result<(), SpecError> {
        for (i, resource) in self.resources.iter().enumerate() {
            if resource.capacity == 0 {
                return Err(SpecError::ZeroCapacity {
                    index: i + 1,
                    name: resource.name.clone(),
                });
            }
        }
        for (i, task) in self.tasks.iter().enumerate() {
            if task.burst == 0 {
                return Err(SpecError::ZeroBurst {
                    index: i + 1,
                    name: task.name.clone(),
                });
            }
        }
        if self.policy == Policy::Mlq && self.quantum == 0 {
            return Err(SpecError::ZeroQuantum);
        }
        Ok(())
    }

    /// Required-resource entries that reference no configured resource.
    ///
    /// Returns `(1-based task position, dangling id value)` pairs. These
    /// tasks can never acquire and will end the run in a deadlock verdict
    /// if they are ever the only unfinished work.
    pub fn dangling_references(&self) -> Vec<(usize, u32)> {
        let count = self.resources.len() as u32;
        let mut dangling = Vec::new();
        for (i, task) in self.tasks.iter().enumerate() {
            for rid in &task.required {
                if rid.value() == 0 || rid.value() > count {
                    dangling.push((i + 1, rid.value()));
                }
            }
        }
        dangling
    }
}
