//! SchedSim CLI - resource-constrained scheduling simulator.

mod parser;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use schedsim_core::Policy;
use schedsim_engine::Engine;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "schedsim")]
#[command(about = "Resource-constrained scheduling simulator", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and print the report
    Run {
        /// Input description (JSON)
        input: PathBuf,
        /// Override the policy selector (1 = LCFS, 2 = MLQ)
        #[arg(long)]
        policy: Option<u32>,
        /// Override the MLQ quantum
        #[arg(long)]
        quantum: Option<u64>,
        /// Use the real-concurrency execution mode (non-deterministic,
        /// no priorities, no deadlock detection)
        #[arg(long)]
        parallel: bool,
        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check an input description without running it
    Validate {
        /// Input description (JSON)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match cli.command {
        Commands::Run {
            input,
            policy,
            quantum,
            parallel,
            output,
        } => {
            let mut spec = load_spec(&input)?;
            if let Some(selector) = policy {
                spec.policy = Policy::from_selector(selector)
                    .with_context(|| format!("unknown policy selector {selector}"))?;
            }
            if let Some(quantum) = quantum {
                spec.quantum = quantum;
            }
            spec.validate().context("invalid description after overrides")?;

            if parallel {
                let result = schedsim_parallel::run_parallel(&spec);
                println!("Completed {} tasks ({} work units)", spec.tasks.len(), result.total_work);
                println!(
                    "Completion order: {}",
                    result
                        .completion_order
                        .iter()
                        .map(|tid| tid.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                return Ok(());
            }

            info!(policy = %spec.policy, quantum = spec.quantum, "running simulation");
            let run = Engine::new(&spec).run();
            let text = report::render_report(&spec, &run);
            match output {
                Some(path) => {
                    std::fs::write(&path, &text)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Report written to {}", path.display());
                }
                None => print!("{text}"),
            }
        }
        Commands::Validate { input } => {
            let spec = load_spec(&input)?;
            println!(
                "OK: {} resources, {} tasks, policy {}, quantum {}",
                spec.resources.len(),
                spec.tasks.len(),
                spec.policy,
                spec.quantum
            );
            for (task, rid) in spec.dangling_references() {
                println!(
                    "warning: task {task} requires resource {rid}, which is not defined \
                     (it will never acquire)"
                );
            }
        }
    }

    Ok(())
}

fn load_spec(path: &Path) -> Result<schedsim_core::SimulationSpec> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parser::parse_description(&text)
        .with_context(|| format!("failed to parse {}", path.display()))
}
