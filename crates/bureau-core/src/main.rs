//! Credit Bureau Scenario Simulator
//!
//! Runs one scenario (or a capped default-policy run) and emits the snapshot
//! record as JSON.

use bureau_core::config::{Config, DEFAULT_CONFIG_PATH};
use bureau_core::output::write_record;
use bureau_core::setup::get_spawn_summary;
use bureau_core::Simulation;
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_SEED: u64 = 42;

/// Command line arguments for the simulator
#[derive(Parser, Debug)]
#[command(name = "bureau_sim")]
#[command(about = "Scenario simulation of competing credit bureaus")]
struct Args {
    /// Scenario id from the catalog, or "none" for default-policy steps
    #[arg(long)]
    scenario: Option<String>,

    /// Override the scenario's round count
    #[arg(long)]
    rounds: Option<u32>,

    /// Random seed for reproducibility [default: config seed, then 42]
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the JSON record here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the scenario catalog and exit
    #[arg(long)]
    list_scenarios: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bureau_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };

    if args.list_scenarios {
        for entry in config.scenarios.entries() {
            println!("{:<24} {:<24} {} rounds", entry.id, entry.name, entry.rounds);
            if !entry.description.is_empty() {
                println!("    {}", entry.description);
            }
        }
        return Ok(());
    }

    let scenario = args.scenario.as_deref().filter(|s| *s != "none");
    let seed = args.seed.or(config.simulation.seed).unwrap_or(DEFAULT_SEED);

    eprintln!("Credit Bureau Simulation");
    eprintln!("========================");
    let config_label = args
        .config
        .as_ref()
        .map_or_else(|| DEFAULT_CONFIG_PATH.to_string(), |p| p.display().to_string());
    eprintln!("Config: {}", config_label);
    eprintln!("Scenario: {}", scenario.unwrap_or("none"));
    eprintln!("Seed: {}", seed);

    let sim = Simulation::new(&config, scenario, args.rounds, SmallRng::seed_from_u64(seed))?;
    eprint!("{}", get_spawn_summary(sim.agents()));
    eprintln!("Rounds: {}", sim.total_rounds());

    let record = sim.run()?;

    match &args.output {
        Some(path) => {
            write_record(&record, path)?;
            eprintln!(
                "Wrote {} model and {} agent snapshots to {}",
                record.model_snapshots.len(),
                record.agent_snapshots.len(),
                path.display()
            );
        }
        None => println!("{}", record.to_json_pretty()?),
    }
    Ok(())
}
