//! Human-readable report rendering.
//!
//! Produces a fixed-width text layout: resource and task definitions,
//! the outcome line, and a time-ordered table with one row per snapshot.

use schedsim_core::SimulationSpec;
use schedsim_engine::{Outcome, RunReport};
use std::fmt::Write;

/// Render the full report for a finished run.
pub fn render_report(spec: &SimulationSpec, report: &RunReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "NR {}", spec.resources.len());
    for (i, resource) in spec.resources.iter().enumerate() {
        let _ = writeln!(
            out,
            "RES id={:<2} name={:<20} count={}",
            i + 1,
            resource.name,
            resource.capacity
        );
    }
    out.push('\n');

    let _ = writeln!(out, "NP {}", spec.tasks.len());
    for (i, task) in spec.tasks.iter().enumerate() {
        let _ = writeln!(
            out,
            "ST id={:<2} name={:<20} priority={:<2} burst={:<4} group={}",
            i + 1,
            task.name,
            task.priority,
            task.burst,
            task.group
        );
    }
    out.push('\n');

    match report.outcome {
        Outcome::Completed(time) => {
            let _ = writeln!(out, "T {time}");
        }
        Outcome::Deadlock => {
            let _ = writeln!(out, "T deadlock");
        }
    }
    out.push('\n');

    let _ = writeln!(out, "{}", header_row(spec));
    for snapshot in report.history.snapshots() {
        let resources = snapshot
            .resources
            .iter()
            .map(|cell| format!("{cell:>4}"))
            .collect::<Vec<_>>()
            .join(" ");
        let tasks = snapshot
            .tasks
            .iter()
            .map(|cell| format!("{cell:<8}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "{:06} | {} || {}", snapshot.time, resources, tasks);
    }

    out
}

fn header_row(spec: &SimulationSpec) -> String {
    let resources = (1..=spec.resources.len())
        .map(|rid| format!("{:>4}", format!("R{rid}")))
        .collect::<Vec<_>>()
        .join(" ");
    let tasks = (1..=spec.tasks.len())
        .map(|tid| format!("{:>8}", format!("TH{tid}")))
        .collect::<Vec<_>>()
        .join(" ");
    format!("TIME   | {resources} || {tasks}")
}
