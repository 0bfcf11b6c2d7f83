//! Interactive car park simulator.
//!
//! Prints the instructions, waits for return, then runs arrivals, departures
//! and the operator monitor until `q` is entered.

use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use car_park::config::SimulationConfig;
use car_park::core::{AppResult, ConsoleSink, EventSink, TracingSink};
use car_park::runtime::{wait_for_start, Simulation};
use car_park::util::telemetry::init_tracing;

const BANNER: &str = "\nWelcome to the car park simulator.\n\
Press p or P followed by return to display the state of the car park.\n\
Press q or Q followed by return to terminate the simulation.\n\
Press return to start the simulation.";

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of parking bays.
    #[arg(long)]
    capacity: Option<usize>,

    /// Milliseconds between arrival/departure attempts.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Random seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Print a JSON run summary to stdout on exit.
    #[arg(long)]
    report_json: bool,

    /// Send car park events to the log instead of stdout.
    #[arg(long)]
    log_events: bool,
}

/// Defaults, then the config file, then `CAR_PARK_*` variables, then flags.
fn load_config(args: &Args) -> AppResult<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path).map_err(anyhow::Error::msg)?,
        None => SimulationConfig::default(),
    };
    config = config.apply_env().map_err(anyhow::Error::msg)?;
    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    if let Some(tick_ms) = args.tick_ms {
        config.tick_ms = tick_ms;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;
    Ok(config)
}

fn run() -> AppResult<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config = load_config(&args)?;
    tracing::debug!(?config, "configuration loaded");

    let mut stdout = std::io::stdout();
    writeln!(stdout, "{BANNER}")?;
    stdout.flush()?;

    let mut input = BufReader::new(std::io::stdin());
    wait_for_start(&mut input).context("waiting for start")?;

    let sink: Arc<dyn EventSink> = if args.log_events {
        Arc::new(TracingSink)
    } else {
        Arc::new(ConsoleSink::stdout())
    };
    let simulation = Simulation::new(config, Some(sink))?;
    let report = simulation
        .run(input, std::io::stdout())
        .context("simulation aborted")?;

    if args.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "car park simulator failed");
            eprintln!("car_park: {e:#}");
            ExitCode::FAILURE
        }
    }
}
