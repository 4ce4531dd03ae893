//! Snapshot Collector
//!
//! Appends one model snapshot and one snapshot per agent after every round.

use bureau_events::{AgentSnapshot, ModelSnapshot, ScenarioId, SimulationRecord, Vote};
use std::fs;
use std::io;
use std::path::Path;

use crate::components::roster::AgentRoster;
use crate::scenarios::ScenarioState;

#[derive(Debug, Clone, Default)]
pub struct DataCollector {
    record: SimulationRecord,
}

impl DataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture post-round state; vote totals are counted at this instant
    pub fn collect(
        &mut self,
        round: u32,
        scenario_id: Option<ScenarioId>,
        state: Option<&ScenarioState>,
        roster: &AgentRoster,
    ) {
        self.record.model_snapshots.push(ModelSnapshot {
            round,
            scenario_id,
            total_yes_votes: roster.count_votes(Vote::Yes),
            total_no_votes: roster.count_votes(Vote::No),
            total_abstain_votes: roster.count_votes(Vote::Abstain),
            flags: state.map(ScenarioState::flags).unwrap_or_default(),
        });

        self.record
            .agent_snapshots
            .extend(roster.iter().map(|agent| AgentSnapshot {
                round,
                agent_name: agent.name().to_string(),
                vote: agent.vote(),
                trust_level: agent.trust_level(),
                current_incentive: agent.current_incentive(),
                market_share: agent.market_share(),
            }));
    }

    pub fn record(&self) -> &SimulationRecord {
        &self.record
    }

    pub fn into_record(self) -> SimulationRecord {
        self.record
    }
}

/// Write a finished record as pretty JSON, creating parent directories
pub fn write_record(record: &SimulationRecord, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = record
        .to_json_pretty()
        .map_err(io::Error::other)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::{Agent, Bureau};
    use crate::scenarios::ExclusivityState;
    use bureau_events::ScenarioFlags;

    fn roster() -> AgentRoster {
        let mut roster = AgentRoster::new();
        for &bureau in Bureau::all() {
            roster.insert(Agent::new(bureau.name(), bureau));
        }
        roster
    }

    #[test]
    fn test_collect_counts_votes() {
        let mut roster = roster();
        roster.get_mut("Experian").unwrap().set_vote(Vote::Yes);
        roster.get_mut("Equifax").unwrap().set_vote(Vote::Abstain);
        roster.get_mut("TransUnion").unwrap().set_vote(Vote::ProposeExclusivity);

        let mut collector = DataCollector::new();
        collector.collect(1, None, None, &roster);

        let model = &collector.record().model_snapshots[0];
        assert_eq!(model.total_yes_votes, 1);
        assert_eq!(model.total_no_votes, 0);
        assert_eq!(model.total_abstain_votes, 1);
        assert_eq!(model.flags, ScenarioFlags::default());
        assert_eq!(collector.record().agent_snapshots.len(), 3);
    }

    #[test]
    fn test_collect_appends_in_round_order() {
        let roster = roster();
        let state = ScenarioState::ExclusivityGambit(ExclusivityState {
            deal_secured: Some(true),
            ..ExclusivityState::default()
        });
        let mut collector = DataCollector::new();
        for round in 1..=3 {
            collector.collect(round, Some(ScenarioId::ExclusivityGambit), Some(&state), &roster);
        }

        let record = collector.into_record();
        assert_eq!(record.model_snapshots.len(), 3);
        assert_eq!(record.agent_snapshots.len(), 9);
        let rounds: Vec<u32> = record.agent_snapshots.iter().map(|a| a.round).collect();
        assert!(rounds.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(record.model_snapshots[2].flags.exclusivity_deal_secured, Some(true));
    }

    #[test]
    fn test_write_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("record.json");

        let mut collector = DataCollector::new();
        collector.collect(1, None, None, &roster());
        write_record(collector.record(), &path).unwrap();

        let json = fs::read_to_string(&path).unwrap();
        let parsed = SimulationRecord::from_json(&json).unwrap();
        assert_eq!(&parsed, collector.record());
    }
}
