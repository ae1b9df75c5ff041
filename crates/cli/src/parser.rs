//! Input description parsing.
//!
//! Consumes the JSON input format (a resource list, a task list, the
//! `PA` policy selector, and the `QT` quantum) and produces the
//! structurally-validated [`SimulationSpec`] the engine expects. All
//! malformed-input detection happens here - the engine never sees a
//! description it could reject.

use schedsim_core::{Policy, ResourceId, ResourceSpec, SimulationSpec, SpecError, TaskSpec};
use serde::Deserialize;

/// Problems turning an input document into a simulation description.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Not valid JSON, or fields of the wrong shape
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// `PA` names no known policy
    #[error("unknown policy selector PA={0} (1 = LCFS, 2 = MLQ)")]
    UnknownPolicy(u32),

    /// Structurally invalid description (zero capacity/burst/quantum)
    #[error("invalid description: {0}")]
    Invalid(#[from] SpecError),
}

fn default_count() -> u32 {
    1
}

fn default_priority() -> i64 {
    1
}

fn default_burst() -> u64 {
    1
}

fn default_pa() -> u32 {
    2
}

fn default_qt() -> u64 {
    50
}

#[derive(Debug, Deserialize)]
struct RawResource {
    name: Option<String>,
    #[serde(default = "default_count")]
    count: u32,
}

#[derive(Debug, Deserialize)]
struct RawTask {
    name: Option<String>,
    #[serde(default)]
    group: String,
    #[serde(default = "default_priority")]
    priority: i64,
    #[serde(default = "default_burst")]
    burst: u64,
    #[serde(default)]
    resources: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct RawInput {
    #[serde(default)]
    resources: Vec<RawResource>,
    #[serde(default)]
    students: Vec<RawTask>,
    #[serde(rename = "PA", default = "default_pa")]
    pa: u32,
    #[serde(rename = "QT", default = "default_qt")]
    qt: u64,
}

/// Parse and validate a JSON input document.
///
/// Missing fields take the input format's defaults (`count` 1,
/// `priority` 1, `burst` 1, `PA` 2, `QT` 50, generated names). Dangling
/// resource references are *not* an error here; they flow into the
/// engine as acquisitions that can never succeed.
pub fn parse_description(input: &str) -> Result<SimulationSpec, ParseError> {
    let raw: RawInput = serde_json::from_str(input)?;

    let resources = raw
        .resources
        .into_iter()
        .enumerate()
        .map(|(i, r)| ResourceSpec {
            name: r.name.unwrap_or_else(|| format!("Resource{}", i + 1)),
            capacity: r.count,
        })
        .collect();

    let tasks = raw
        .students
        .into_iter()
        .enumerate()
        .map(|(i, t)| TaskSpec {
            name: t.name.unwrap_or_else(|| format!("Student{}", i + 1)),
            group: t.group,
            priority: t.priority,
            burst: t.burst,
            required: t.resources.into_iter().map(ResourceId::new).collect(),
        })
        .collect();

    let policy = Policy::from_selector(raw.pa).ok_or(ParseError::UnknownPolicy(raw.pa))?;

    let spec = SimulationSpec {
        resources,
        tasks,
        policy,
        quantum: raw.qt,
    };
    spec.validate()?;
    Ok(spec)
}
