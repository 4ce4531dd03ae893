//! Round Scheduler
//!
//! Activates every agent exactly once per round, in an order reshuffled each
//! round from the simulation's random stream.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::trace;

use super::policy::RoundPolicy;
use crate::components::roster::AgentRoster;
use crate::error::SimError;

#[derive(Debug, Clone, Default)]
pub struct RandomActivation {
    steps: u32,
    last_order: Vec<usize>,
}

impl RandomActivation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed activation passes
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Roster indices in the order they were activated last round
    pub fn last_order(&self) -> &[usize] {
        &self.last_order
    }

    /// Activate every agent once under `policy`.
    ///
    /// Each decision is applied before the next agent decides, so later agents
    /// observe earlier agents' changes from the same round.
    pub fn step(
        &mut self,
        roster: &mut AgentRoster,
        policy: &RoundPolicy<'_>,
        rng: &mut SmallRng,
    ) -> Result<(), SimError> {
        let mut order: Vec<usize> = (0..roster.len()).collect();
        order.shuffle(rng);

        for &i in &order {
            let Some(agent) = roster.get_index(i) else {
                continue;
            };
            let decision = policy.decide(agent, rng)?;
            trace!("{} decided {:?}", agent.name(), decision);
            if let Some(agent) = roster.get_index_mut(i) {
                agent.apply(decision);
            }
        }

        self.last_order = order;
        self.steps += 1;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.steps = 0;
        self.last_order.clear();
    }
}
