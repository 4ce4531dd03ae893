//! Agent Spawning
//!
//! Builds the roster of bureau agents from configuration.

use std::collections::BTreeMap;
use std::fmt;

use crate::components::agent::{Agent, Bureau};
use crate::components::roster::AgentRoster;
use crate::config::AgentConfig;
use crate::error::ConfigError;

/// Name for the `index`-th (1-based) agent of a bureau fielding `count` agents
pub fn agent_name(bureau: Bureau, index: u32, count: u32) -> String {
    if count > 1 {
        format!("{}_{}", bureau.name(), index)
    } else {
        bureau.name().to_string()
    }
}

/// Create every configured agent, bureau by bureau
pub fn spawn_roster(config: &AgentConfig) -> Result<AgentRoster, ConfigError> {
    if config.total() == 0 {
        return Err(ConfigError::EmptyRoster);
    }

    let mut roster = AgentRoster::new();
    for &bureau in Bureau::all() {
        let count = config.count(bureau);
        for i in 1..=count {
            let mut agent = Agent::new(agent_name(bureau, i, count), bureau);
            if let Some(trust) = config.initial_trust.get(bureau) {
                agent = agent.with_trust(trust);
            }
            roster.insert(agent);
        }
    }
    Ok(roster)
}

/// Summary of spawned agents
#[derive(Debug)]
pub struct SpawnSummary {
    pub total_agents: usize,
    pub by_bureau: BTreeMap<Bureau, usize>,
}

pub fn get_spawn_summary(roster: &AgentRoster) -> SpawnSummary {
    let mut by_bureau = BTreeMap::new();
    for agent in roster.iter() {
        *by_bureau.entry(agent.bureau()).or_insert(0) += 1;
    }
    SpawnSummary {
        total_agents: roster.len(),
        by_bureau,
    }
}

impl fmt::Display for SpawnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total agents: {}", self.total_agents)?;
        for (bureau, count) in &self.by_bureau {
            writeln!(f, "  {}: {}", bureau, count)?;
        }
        Ok(())
    }
}
