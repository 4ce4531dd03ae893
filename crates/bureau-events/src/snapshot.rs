//! Snapshot Types
//!
//! Serialization structs for the per-round records a simulation produces.
//!
//! After every round the engine appends one [`ModelSnapshot`] and one
//! [`AgentSnapshot`] per agent. Both sequences are append-only and ordered by
//! round; they are the only view reporting has into simulation history.

use serde::{Deserialize, Serialize};

use crate::{Incentive, ScenarioId, Vote};

/// Scenario-specific values surfaced on the model snapshot.
///
/// Only the fields belonging to the active scenario are populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFlags {
    /// Client decision for the exclusivity deal; `None` while undecided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusivity_deal_secured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breached_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breach_severity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alliance_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrant_strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alliance_formed: Option<bool>,
}

/// Model-level state captured after a round completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub round: u32,
    pub scenario_id: Option<ScenarioId>,
    pub total_yes_votes: u32,
    pub total_no_votes: u32,
    pub total_abstain_votes: u32,
    #[serde(flatten)]
    pub flags: ScenarioFlags,
}

impl ModelSnapshot {
    /// Total of the three generic ballot tallies.
    pub fn ballot_count(&self) -> u32 {
        self.total_yes_votes + self.total_no_votes + self.total_abstain_votes
    }
}

/// Agent-level state captured after a round completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub round: u32,
    pub agent_name: String,
    pub vote: Option<Vote>,
    pub trust_level: f64,
    pub current_incentive: Incentive,
    pub market_share: f64,
}

/// The complete output of one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub model_snapshots: Vec<ModelSnapshot>,
    pub agent_snapshots: Vec<AgentSnapshot>,
}

impl SimulationRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the model snapshot for a round.
    pub fn model_at_round(&self, round: u32) -> Option<&ModelSnapshot> {
        self.model_snapshots.iter().find(|m| m.round == round)
    }

    /// Returns every agent snapshot taken at a round.
    pub fn agents_at_round(&self, round: u32) -> Vec<&AgentSnapshot> {
        self.agent_snapshots
            .iter()
            .filter(|a| a.round == round)
            .collect()
    }

    /// Returns one agent's snapshots in round order.
    pub fn agent_history(&self, agent_name: &str) -> Vec<&AgentSnapshot> {
        self.agent_snapshots
            .iter()
            .filter(|a| a.agent_name == agent_name)
            .collect()
    }

    /// Returns an agent's snapshot at a given round.
    pub fn agent_at_round(&self, agent_name: &str, round: u32) -> Option<&AgentSnapshot> {
        self.agent_snapshots
            .iter()
            .find(|a| a.agent_name == agent_name && a.round == round)
    }

    /// Returns the last recorded round, if any.
    pub fn final_round(&self) -> Option<u32> {
        self.model_snapshots.last().map(|m| m.round)
    }

    /// Serializes the record to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a record from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
