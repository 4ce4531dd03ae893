//! Agent Roster
//!
//! Owns every agent and resolves them by name.

use bureau_events::Vote;
use std::collections::HashMap;

use super::agent::{Agent, Bureau};

/// All agents in a simulation, keyed by unique name.
///
/// Insertion order is kept for display only; nothing in the engine depends on it
/// except the choice of each bureau's lead agent.
#[derive(Debug, Clone, Default)]
pub struct AgentRoster {
    agents: Vec<Agent>,
    index: HashMap<String, usize>,
}

impl AgentRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent; a duplicate name replaces the existing agent
    pub fn insert(&mut self, agent: Agent) {
        match self.index.get(agent.name()) {
            Some(&i) => self.agents[i] = agent,
            None => {
                self.index.insert(agent.name().to_string(), self.agents.len());
                self.agents.push(agent);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Agent> {
        self.index.get(name).map(|&i| &self.agents[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Agent> {
        match self.index.get(name) {
            Some(&i) => self.agents.get_mut(i),
            None => None,
        }
    }

    pub fn get_index(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut Agent> {
        self.agents.get_mut(index)
    }

    /// First agent created for a bureau
    pub fn lead(&self, bureau: Bureau) -> Option<&Agent> {
        self.agents.iter().find(|a| a.bureau() == bureau)
    }

    /// Bureaus with at least one agent, in canonical order
    pub fn present_bureaus(&self) -> Vec<Bureau> {
        Bureau::all()
            .iter()
            .copied()
            .filter(|&b| self.lead(b).is_some())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    pub fn names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of agents whose standing vote equals `vote`
    pub fn count_votes(&self, vote: Vote) -> u32 {
        self.agents.iter().filter(|a| a.vote() == Some(vote)).count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> AgentRoster {
        let mut roster = AgentRoster::new();
        roster.insert(Agent::new("Equifax_1", Bureau::Equifax));
        roster.insert(Agent::new("Equifax_2", Bureau::Equifax));
        roster.insert(Agent::new("TransUnion", Bureau::TransUnion));
        roster
    }

    #[test]
    fn test_lookup_by_name() {
        let roster = roster();
        assert_eq!(roster.len(), 3);
        assert!(roster.get("Equifax_2").is_some());
        assert!(roster.get("Experian").is_none());
    }

    #[test]
    fn test_lead_is_first_of_bureau() {
        let roster = roster();
        assert_eq!(roster.lead(Bureau::Equifax).unwrap().name(), "Equifax_1");
        assert!(roster.lead(Bureau::Experian).is_none());
        assert_eq!(
            roster.present_bureaus(),
            vec![Bureau::Equifax, Bureau::TransUnion]
        );
    }

    #[test]
    fn test_count_votes() {
        let mut roster = roster();
        roster.get_mut("Equifax_1").unwrap().set_vote(Vote::Yes);
        roster.get_mut("TransUnion").unwrap().set_vote(Vote::Yes);
        roster.get_mut("Equifax_2").unwrap().set_vote(Vote::Abstain);
        assert_eq!(roster.count_votes(Vote::Yes), 2);
        assert_eq!(roster.count_votes(Vote::Abstain), 1);
        assert_eq!(roster.count_votes(Vote::No), 0);
    }

    #[test]
    fn test_insert_duplicate_replaces() {
        let mut roster = roster();
        roster.insert(Agent::new("TransUnion", Bureau::TransUnion).with_trust(0.9));
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.get("TransUnion").unwrap().trust_level(), 0.9);
    }
}
