//! Credit Bureau Scenario Simulation
//!
//! Three credit bureaus (Experian, Equifax, TransUnion) play through scripted
//! multi-round scenarios. Each round mutates agent trust, incentive, vote and
//! market share, and the run produces an ordered record of model and agent
//! snapshots for downstream reporting.

use bureau_events::SimulationRecord;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod error;
pub mod output;
pub mod scenarios;
pub mod setup;
pub mod simulation;
pub mod store;
pub mod systems;

pub use components::*;
pub use config::Config;
pub use error::{ConfigError, SimError};
pub use scenarios::{spec_for, ScenarioSpec, ScenarioState};
pub use simulation::Simulation;
pub use store::{RunStatus, SimulationId, SimulationStore, StoredRun};

/// Run a catalog scenario to completion.
///
/// `round_count` overrides the catalog's round count when given.
pub fn run(
    config: &Config,
    scenario_id: &str,
    round_count: Option<u32>,
    rng: SmallRng,
) -> Result<SimulationRecord, SimError> {
    Simulation::new(config, Some(scenario_id), round_count, rng)?.run()
}
