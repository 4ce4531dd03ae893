//! Error Types
//!
//! Configuration and run-level failures.

use bureau_events::ScenarioId;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Scenario id is missing from the catalog or has no compiled script
    #[error("unknown scenario: '{0}'")]
    UnknownScenario(String),
    #[error("invalid round count {rounds} for '{scenario}': at least one round is required")]
    InvalidRoundCount { scenario: String, rounds: u32 },
    #[error("agent roster is empty: at least one agent is required")]
    EmptyRoster,
    /// Starting trust override that cannot be clamped into [0, 1]
    #[error("invalid initial trust {value} for {bureau}: must be a finite number")]
    InvalidTrust { bureau: String, value: f64 },
}

/// Errors surfaced by a simulation or the store that owns it.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("agent not found: '{0}'")]
    AgentNotFound(String),
    #[error("simulation not found: {0}")]
    SimulationNotFound(Uuid),
    #[error("simulation {0} has no completed record")]
    RecordUnavailable(Uuid),
    #[error("no state initialized for scenario '{0}'")]
    MissingScenarioState(ScenarioId),
    #[error("scenario state for '{found}' used where '{expected}' was expected")]
    StateMismatch {
        expected: ScenarioId,
        found: ScenarioId,
    },
    /// A round failed part-way; the run is abandoned
    #[error("round {round} failed: {source}")]
    RoundFault {
        round: u32,
        #[source]
        source: Box<SimError>,
    },
}
