//! Configuration System
//!
//! Loads roster, run limits and the scenario catalog from a TOML file.
//!
//! ```toml
//! [simulation]
//! seed = 7
//! max_default_steps = 10
//!
//! [agents]
//! experian = 1
//! equifax = 1
//! transunion = 1
//!
//! [agents.initial_trust]
//! experian = 0.9
//!
//! [[scenarios]]
//! id = "exclusivity_gambit"
//! name = "Exclusivity Gambit"
//! rounds = 5
//! ```

use bureau_events::ScenarioId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::components::agent::Bureau;
use crate::error::ConfigError;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "bureau_sim.toml";

/// Rounds a catalog scenario runs when no override is given
pub const DEFAULT_SCENARIO_ROUNDS: u32 = 5;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub agents: AgentConfig,
    pub scenarios: ScenarioCatalog,
}

/// Run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed used when the caller does not supply one
    pub seed: Option<u64>,
    /// Cap on steps taken when no scenario is active
    pub max_default_steps: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_default_steps: 10,
        }
    }
}

/// Agent roster configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub experian: u32,
    pub equifax: u32,
    pub transunion: u32,
    pub initial_trust: TrustOverrides,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            experian: 1,
            equifax: 1,
            transunion: 1,
            initial_trust: TrustOverrides::default(),
        }
    }
}

impl AgentConfig {
    pub fn count(&self, bureau: Bureau) -> u32 {
        match bureau {
            Bureau::Experian => self.experian,
            Bureau::Equifax => self.equifax,
            Bureau::TransUnion => self.transunion,
        }
    }

    pub fn total(&self) -> u32 {
        self.experian + self.equifax + self.transunion
    }
}

/// Per-bureau starting trust; unset bureaus start at the default
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experian: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equifax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transunion: Option<f64>,
}

impl TrustOverrides {
    pub fn get(&self, bureau: Bureau) -> Option<f64> {
        match bureau {
            Bureau::Experian => self.experian,
            Bureau::Equifax => self.equifax,
            Bureau::TransUnion => self.transunion,
        }
    }

    pub fn set(&mut self, bureau: Bureau, trust: f64) {
        match bureau {
            Bureau::Experian => self.experian = Some(trust),
            Bureau::Equifax => self.equifax = Some(trust),
            Bureau::TransUnion => self.transunion = Some(trust),
        }
    }
}

/// A scenario as offered by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

fn default_rounds() -> u32 {
    DEFAULT_SCENARIO_ROUNDS
}

/// The list of scenarios callers may start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioCatalog(pub Vec<ScenarioEntry>);

impl Default for ScenarioCatalog {
    fn default() -> Self {
        let description = |id: ScenarioId| match id {
            ScenarioId::ExclusivityGambit => {
                "Experian attempts to secure an exclusive data-sharing agreement, aiming for market dominance."
            }
            ScenarioId::DataBreachResponse => {
                "One bureau experiences a data breach, testing trust and crisis management across the industry."
            }
            ScenarioId::NewEntrantAlliance => {
                "A new fintech startup proposes an alliance, potentially disrupting the existing market dynamics."
            }
        };

        Self(
            ScenarioId::all()
                .iter()
                .map(|&id| ScenarioEntry {
                    id: id.as_str().to_string(),
                    name: id.title().to_string(),
                    description: description(id).to_string(),
                    rounds: DEFAULT_SCENARIO_ROUNDS,
                })
                .collect(),
        )
    }
}

impl ScenarioCatalog {
    /// Look up an entry by id
    pub fn get(&self, id: &str) -> Option<&ScenarioEntry> {
        self.0.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[ScenarioEntry] {
        &self.0
    }

    /// Resolve a catalog id to its compiled scenario and default round count
    pub fn resolve(&self, id: &str) -> Result<(ScenarioId, u32), ConfigError> {
        let entry = self
            .get(id)
            .ok_or_else(|| ConfigError::UnknownScenario(id.to_string()))?;
        let scenario = id
            .parse::<ScenarioId>()
            .map_err(|e| ConfigError::UnknownScenario(e.0))?;
        Ok((scenario, entry.rounds))
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string and validate it
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
            warn!("Could not load {}: {}. Using defaults.", DEFAULT_CONFIG_PATH, e);
            Self::default()
        })
    }

    /// Check roster size, trust overrides, and that every catalog entry names a
    /// runnable scenario
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agents.total() == 0 {
            return Err(ConfigError::EmptyRoster);
        }
        for &bureau in Bureau::all() {
            if let Some(value) = self.agents.initial_trust.get(bureau) {
                if !value.is_finite() {
                    return Err(ConfigError::InvalidTrust {
                        bureau: bureau.name().to_string(),
                        value,
                    });
                }
            }
        }
        for entry in self.scenarios.entries() {
            if entry.id.parse::<ScenarioId>().is_err() {
                return Err(ConfigError::UnknownScenario(entry.id.clone()));
            }
            if entry.rounds == 0 {
                return Err(ConfigError::InvalidRoundCount {
                    scenario: entry.id.clone(),
                    rounds: 0,
                });
            }
        }
        Ok(())
    }
}
