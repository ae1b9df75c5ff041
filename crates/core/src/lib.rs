//! SchedSim core data models.
//!
//! This crate defines the shared data structures for the scheduling
//! simulator: identifiers, resource and task descriptors, the simulation
//! description consumed by the engine, and the snapshot record that makes
//! up an execution history.

#![warn(missing_docs)]

// Core identities
mod id;

// Descriptors
mod resource;
mod task;

// Simulation description and history records
mod snapshot;
mod spec;

pub use id::{ResourceId, TaskId};
pub use resource::ResourceSpec;
pub use snapshot::Snapshot;
pub use spec::{Policy, SimulationSpec, SpecError};
pub use task::{TaskSpec, TaskStatus};

/// Simulated time in work units.
pub type Time = u64;
