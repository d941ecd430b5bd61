//! Hermes CLI
//!
//! Runs the parcel-logistics simulation over an input file and writes
//! the trace to stdout. Diagnostics go to stderr so the trace stays
//! byte-exact.
//!
//! # Example
//!
//! ```bash
//! hermes scenario.txt
//! RUST_LOG=info hermes scenario.txt
//! ```

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hermes::{Scenario, SimError, Simulation};

/// Deterministic parcel-logistics simulator.
///
/// Reads a scenario file (global parameters, warehouse adjacency
/// matrix, package postings) and emits the chronological trace of
/// every package state change until all packages are delivered.
#[derive(Parser, Debug)]
#[command(name = "hermes")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the scenario input file.
    input: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hermes: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let scenario = Scenario::from_file(&args.input)?;
    info!(
        warehouses = scenario.network.warehouse_count(),
        edges = scenario.network.edge_count(),
        postings = scenario.postings.len(),
        "scenario loaded"
    );

    let stdout = io::stdout().lock();
    let mut sim = Simulation::new(scenario, BufWriter::new(stdout));
    let stats = sim.run()?;

    info!(
        arrivals = stats.arrivals,
        firings = stats.firings,
        idle_firings = stats.idle_firings,
        delivered = stats.delivered,
        dropped = stats.dropped,
        final_time = stats.final_time.ticks(),
        "simulation complete"
    );
    Ok(())
}
