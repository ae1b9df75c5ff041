//! Resource descriptor.

use serde::{Deserialize, Serialize};

/// A reusable resource with a fixed number of tokens.
///
/// Capacity is the maximum number of tasks that may hold the resource at
/// the same time. The descriptor is immutable; runtime token accounting
/// lives in the engine's resource ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Display name
    pub name: String,

    /// Token count (maximum concurrent holders), at least 1
    pub capacity: u32,
}

impl ResourceSpec {
    /// Create a new resource descriptor.
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}
