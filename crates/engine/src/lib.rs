//! The SchedSim reference engine.
//!
//! Single-threaded, deterministic simulation of task scheduling over a
//! pool of finite reusable resources. The engine is built from a
//! [`SimulationSpec`](schedsim_core::SimulationSpec) and driven by
//! [`Engine::run`], which produces either a logical completion time or a
//! deadlock verdict, together with the full snapshot history.

#![warn(missing_docs)]

mod engine;
mod history;
mod ledger;
mod registry;
pub mod policy;

pub use engine::{Engine, LogicalClock, Outcome, RunReport};
pub use history::History;
pub use ledger::ResourceLedger;
pub use registry::TaskRegistry;
