//! Decision Policy
//!
//! What an agent does in a round: the [`Decision`] it returns, the default
//! ballot policy, and dispatch into scenario decision tables.

use bureau_events::{Incentive, Vote};
use rand::rngs::SmallRng;
use rand::Rng;
use tracing::warn;

use crate::components::agent::Agent;
use crate::error::SimError;
use crate::scenarios::{ScenarioSpec, ScenarioState};

/// Trust above which the default policy votes yes
pub const DEFAULT_YES_THRESHOLD: f64 = 0.6;
/// Trust below which the default policy votes no
pub const DEFAULT_NO_THRESHOLD: f64 = 0.4;

const BALLOT: [Vote; 3] = [Vote::Yes, Vote::No, Vote::Abstain];

/// The outcome of one agent's turn.
///
/// `None` fields leave the agent's current value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    pub vote: Option<Vote>,
    pub incentive: Option<Incentive>,
    pub trust_delta: f64,
    pub market_share_delta: f64,
    pub scenario_data: Vec<(&'static str, bool)>,
}

impl Decision {
    /// A decision that changes nothing
    pub fn hold() -> Self {
        Self::default()
    }

    pub fn with_vote(mut self, vote: Vote) -> Self {
        self.vote = Some(vote);
        self
    }

    pub fn with_incentive(mut self, incentive: Incentive) -> Self {
        self.incentive = Some(incentive);
        self
    }

    pub fn with_trust_delta(mut self, delta: f64) -> Self {
        self.trust_delta = delta;
        self
    }

    pub fn with_market_share_delta(mut self, delta: f64) -> Self {
        self.market_share_delta = delta;
        self
    }

    pub fn with_flag(mut self, key: &'static str, value: bool) -> Self {
        self.scenario_data.push((key, value));
        self
    }

    pub fn is_hold(&self) -> bool {
        *self == Self::hold()
    }
}

/// Read-only view of the round handed to scenario decision functions
#[derive(Debug, Clone, Copy)]
pub struct RoundContext<'a> {
    pub round: u32,
    pub total_rounds: u32,
    pub state: &'a ScenarioState,
}

/// Ballot policy used outside scenarios and wherever a scenario has no entry
pub fn default_policy(agent: &Agent, rng: &mut SmallRng) -> Decision {
    let trust = agent.trust_level();
    let vote = if trust > DEFAULT_YES_THRESHOLD {
        Vote::Yes
    } else if trust < DEFAULT_NO_THRESHOLD {
        Vote::No
    } else {
        BALLOT[rng.gen_range(0..BALLOT.len())]
    };
    Decision::hold().with_vote(vote)
}

/// How agents decide during one round
#[derive(Debug, Clone, Copy)]
pub enum RoundPolicy<'a> {
    /// Every agent follows [`default_policy`]
    Default,
    /// Agents consult the scenario's decision table
    Scenario {
        spec: &'static ScenarioSpec,
        ctx: RoundContext<'a>,
    },
}

impl RoundPolicy<'_> {
    /// Produce the agent's decision for this round
    pub fn decide(&self, agent: &Agent, rng: &mut SmallRng) -> Result<Decision, SimError> {
        match self {
            RoundPolicy::Default => Ok(default_policy(agent, rng)),
            RoundPolicy::Scenario { spec, ctx } => match spec.decisions.entry(agent.bureau()) {
                Some(decide) => decide(agent, ctx, rng),
                None => {
                    warn!(
                        "{} has no action for round {} of {}. Performing default action.",
                        agent.name(),
                        ctx.round,
                        spec.id
                    );
                    Ok(default_policy(agent, rng))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::Bureau;
    use rand::SeedableRng;

    #[test]
    fn test_default_policy_high_trust_votes_yes() {
        let mut rng = SmallRng::seed_from_u64(1);
        let agent = Agent::new("Experian", Bureau::Experian).with_trust(0.61);
        assert_eq!(default_policy(&agent, &mut rng).vote, Some(Vote::Yes));
    }

    #[test]
    fn test_default_policy_low_trust_votes_no() {
        let mut rng = SmallRng::seed_from_u64(1);
        let agent = Agent::new("Equifax", Bureau::Equifax).with_trust(0.39);
        assert_eq!(default_policy(&agent, &mut rng).vote, Some(Vote::No));
    }

    #[test]
    fn test_default_policy_middle_trust_picks_ballot() {
        let mut rng = SmallRng::seed_from_u64(7);
        let agent = Agent::new("TransUnion", Bureau::TransUnion);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let vote = default_policy(&agent, &mut rng).vote.unwrap();
            assert!(vote.is_ballot());
            seen.insert(vote);
        }
        assert_eq!(seen.len(), 3, "all three ballot options should appear");
    }

    #[test]
    fn test_default_policy_is_seed_deterministic() {
        let agent = Agent::new("TransUnion", Bureau::TransUnion);
        let run = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..20)
                .map(|_| default_policy(&agent, &mut rng).vote)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_decision_builder() {
        let decision = Decision::hold()
            .with_vote(Vote::AcknowledgeBreach)
            .with_trust_delta(-0.5);
        assert!(!decision.is_hold());
        assert!(Decision::hold().is_hold());
        assert_eq!(decision.incentive, None);
    }
}
