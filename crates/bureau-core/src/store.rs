//! Simulation Store
//!
//! Owned map of runs keyed by simulation id. Each run is constructed, driven
//! to completion and filed with its outcome.

use bureau_events::SimulationRecord;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::error::SimError;
use crate::simulation::Simulation;

pub type SimulationId = Uuid;

/// Lifecycle of a stored run.
///
/// `start` drives a run to completion before returning, so callers of this
/// store only ever observe `Completed` or `Failed`. `Running` is the status a
/// run holds while `start` is still executing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredRun {
    pub id: SimulationId,
    /// Catalog id, or `None` for a default-policy run
    pub scenario_id: Option<String>,
    pub total_rounds: u32,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<SimulationRecord>,
}

#[derive(Debug, Default)]
pub struct SimulationStore {
    config: Config,
    runs: HashMap<SimulationId, StoredRun>,
}

impl SimulationStore {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            runs: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Construct and run a simulation, returning the id its outcome is filed under.
    ///
    /// Blocks until the run finishes; the returned id already maps to a
    /// completed or failed run. Construction errors are returned and nothing is stored. A run that fails
    /// part-way is stored as failed, without a record.
    pub fn start(
        &mut self,
        scenario_id: Option<&str>,
        rounds: Option<u32>,
        seed: u64,
    ) -> Result<SimulationId, SimError> {
        let sim = Simulation::new(
            &self.config,
            scenario_id,
            rounds,
            SmallRng::seed_from_u64(seed),
        )?;

        let id = Uuid::new_v4();
        self.runs.insert(
            id,
            StoredRun {
                id,
                scenario_id: scenario_id.map(str::to_string),
                total_rounds: sim.total_rounds(),
                status: RunStatus::Running,
                error: None,
                record: None,
            },
        );
        info!("Simulation {} started", id);

        let outcome = sim.run();
        if let Some(run) = self.runs.get_mut(&id) {
            match outcome {
                Ok(record) => {
                    info!("Simulation {} completed", id);
                    run.status = RunStatus::Completed;
                    run.record = Some(record);
                }
                Err(e) => {
                    error!("Simulation {} failed: {}", id, e);
                    run.status = RunStatus::Failed;
                    run.error = Some(e.to_string());
                }
            }
        }
        Ok(id)
    }

    pub fn get(&self, id: SimulationId) -> Result<&StoredRun, SimError> {
        self.runs.get(&id).ok_or(SimError::SimulationNotFound(id))
    }

    pub fn status(&self, id: SimulationId) -> Result<RunStatus, SimError> {
        self.get(id).map(|run| run.status)
    }

    pub fn record(&self, id: SimulationId) -> Result<&SimulationRecord, SimError> {
        self.get(id)?
            .record
            .as_ref()
            .ok_or(SimError::RecordUnavailable(id))
    }

    pub fn remove(&mut self, id: SimulationId) -> Result<StoredRun, SimError> {
        self.runs.remove(&id).ok_or(SimError::SimulationNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_start_stores_completed_run() {
        let mut store = SimulationStore::new(Config::default());
        let id = store.start(Some("new_entrant_alliance"), None, 7).unwrap();

        assert_eq!(store.status(id).unwrap(), RunStatus::Completed);
        let record = store.record(id).unwrap();
        assert_eq!(record.model_snapshots.len(), 5);
        assert_eq!(record.agent_snapshots.len(), 15);
        assert_eq!(store.get(id).unwrap().scenario_id.as_deref(), Some("new_entrant_alliance"));
    }

    #[test]
    fn test_construction_error_stores_nothing() {
        let mut store = SimulationStore::new(Config::default());
        let result = store.start(Some("hostile_takeover"), None, 7);
        assert!(matches!(
            result,
            Err(SimError::Config(ConfigError::UnknownScenario(_)))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_id_not_found() {
        let mut store = SimulationStore::new(Config::default());
        let missing = Uuid::new_v4();
        assert!(matches!(store.status(missing), Err(SimError::SimulationNotFound(_))));
        assert!(matches!(store.record(missing), Err(SimError::SimulationNotFound(_))));
        assert!(matches!(store.remove(missing), Err(SimError::SimulationNotFound(_))));
    }

    #[test]
    fn test_runs_are_independent() {
        let mut store = SimulationStore::new(Config::default());
        let a = store.start(Some("exclusivity_gambit"), None, 1).unwrap();
        let b = store.start(None, Some(3), 1).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);

        let removed = store.remove(a).unwrap();
        assert_eq!(removed.status, RunStatus::Completed);
        assert_eq!(store.len(), 1);
        assert_eq!(store.record(b).unwrap().model_snapshots.len(), 3);
    }

    #[test]
    fn test_start_returns_finished_runs() {
        let mut store = SimulationStore::new(Config::default());
        let ids = [
            store.start(Some("exclusivity_gambit"), Some(2), 5).unwrap(),
            store.start(Some("data_breach_response"), None, 5).unwrap(),
            store.start(None, None, 5).unwrap(),
        ];
        for id in ids {
            assert_ne!(store.status(id).unwrap(), RunStatus::Running);
            assert!(store.record(id).is_ok());
        }
    }

    #[test]
    fn test_stored_run_serializes_status() {
        let mut store = SimulationStore::new(Config::default());
        let id = store.start(None, Some(1), 3).unwrap();
        let json = serde_json::to_value(store.get(id).unwrap()).unwrap();
        assert_eq!(json["status"], "completed");
        assert!(json.get("error").is_none());
    }
}
