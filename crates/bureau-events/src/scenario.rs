//! Scenario Identifiers
//!
//! The closed set of scripted scenarios the engine knows how to run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a scripted multi-round scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    /// Experian pursues an exclusive data-sharing agreement with a major client.
    ExclusivityGambit,
    /// One bureau suffers a data breach and the industry reacts.
    DataBreachResponse,
    /// A fintech entrant proposes an alliance to one incumbent.
    NewEntrantAlliance,
}

impl ScenarioId {
    /// Returns the catalog identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioId::ExclusivityGambit => "exclusivity_gambit",
            ScenarioId::DataBreachResponse => "data_breach_response",
            ScenarioId::NewEntrantAlliance => "new_entrant_alliance",
        }
    }

    /// Returns the human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            ScenarioId::ExclusivityGambit => "Exclusivity Gambit",
            ScenarioId::DataBreachResponse => "Data Breach Response",
            ScenarioId::NewEntrantAlliance => "New Entrant Alliance",
        }
    }

    /// Returns all scenario variants.
    pub fn all() -> &'static [ScenarioId] {
        &[
            ScenarioId::ExclusivityGambit,
            ScenarioId::DataBreachResponse,
            ScenarioId::NewEntrantAlliance,
        ]
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownScenarioError(pub String);

impl fmt::Display for UnknownScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scenario: '{}'", self.0)
    }
}

impl std::error::Error for UnknownScenarioError {}

impl FromStr for ScenarioId {
    type Err = UnknownScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioId::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownScenarioError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_id_parse() {
        assert_eq!(
            "exclusivity_gambit".parse::<ScenarioId>().unwrap(),
            ScenarioId::ExclusivityGambit
        );
        assert_eq!(
            "new_entrant_alliance".parse::<ScenarioId>().unwrap(),
            ScenarioId::NewEntrantAlliance
        );
        assert!("hostile_takeover".parse::<ScenarioId>().is_err());
    }

    #[test]
    fn test_scenario_id_serialization() {
        let json = serde_json::to_string(&ScenarioId::DataBreachResponse).unwrap();
        assert_eq!(json, r#""data_breach_response""#);
    }
}
