//! Exclusivity Gambit
//!
//! The lead Experian agent proposes an exclusive data-sharing deal in round 1.
//! Competitors react in round 2, and a major client decides at the decision
//! round based on the proposer's trust relative to everyone else's.

use bureau_events::{Incentive, Vote};
use rand::rngs::SmallRng;
use rand::Rng;
use tracing::{debug, info};

use super::{HookContext, ScenarioState};
use crate::components::agent::{scenario_flags, Agent, Bureau};
use crate::components::roster::AgentRoster;
use crate::error::SimError;
use crate::systems::policy::{Decision, RoundContext};

/// Round in which the client accepts or rejects the deal
pub const DECISION_ROUND: u32 = 3;

/// Half-width of the uniform noise added to the competitors' average trust
pub const CLIENT_PERTURBATION: f64 = 0.1;

/// Trust a competitor needs to counter-offer rather than undermine
pub const COUNTER_OFFER_TRUST: f64 = 0.4;

pub const PROPOSER_SHARE_GAIN: f64 = 0.1;
pub const COMPETITOR_SHARE_GAIN: f64 = 0.02;
pub const COMPETITOR_TRUST_PENALTY: f64 = -0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct ExclusivityState {
    /// Lead Experian agent, if any Experian agent exists
    pub deal_proposed_by: Option<String>,
    /// Client decision; `None` until the decision round
    pub deal_secured: Option<bool>,
    pub decision_round: u32,
}

impl Default for ExclusivityState {
    fn default() -> Self {
        Self {
            deal_proposed_by: None,
            deal_secured: None,
            decision_round: DECISION_ROUND,
        }
    }
}

pub fn seed(roster: &mut AgentRoster, _rng: &mut SmallRng) -> Result<ScenarioState, SimError> {
    let proposer = roster.lead(Bureau::Experian).map(|a| a.name().to_string());
    info!(
        "Exclusivity gambit proposed by {}",
        proposer.as_deref().unwrap_or("nobody")
    );
    Ok(ScenarioState::ExclusivityGambit(ExclusivityState {
        deal_proposed_by: proposer,
        ..ExclusivityState::default()
    }))
}

/// Client decision: the deal succeeds when the proposer actually proposed and
/// its trust beats the others' average plus uniform noise.
pub fn client_decides(
    proposer_trust: f64,
    proposed: bool,
    others_average: f64,
    rng: &mut SmallRng,
) -> bool {
    let perturbation = rng.gen_range(-CLIENT_PERTURBATION..=CLIENT_PERTURBATION);
    proposed && proposer_trust > others_average + perturbation
}

pub fn round_hook(ctx: &mut HookContext<'_>, rng: &mut SmallRng) -> Result<(), SimError> {
    let state = ctx.state.exclusivity_mut()?;
    if ctx.round != state.decision_round {
        return Ok(());
    }

    let Some(proposer_name) = state.deal_proposed_by.clone() else {
        state.deal_secured = Some(false);
        info!("No proposer present; client makes no exclusivity deal");
        return Ok(());
    };
    let proposer = ctx
        .roster
        .get(&proposer_name)
        .ok_or_else(|| SimError::AgentNotFound(proposer_name.clone()))?;
    let proposer_trust = proposer.trust_level();
    let proposed = proposer.vote() == Some(Vote::ProposeExclusivity);

    let others: Vec<f64> = ctx
        .roster
        .iter()
        .filter(|a| a.name() != proposer_name)
        .map(|a| a.trust_level())
        .collect();
    let others_average = if others.is_empty() {
        0.0
    } else {
        others.iter().sum::<f64>() / others.len() as f64
    };

    let secured = client_decides(proposer_trust, proposed, others_average, rng);
    state.deal_secured = Some(secured);

    if let Some(proposer) = ctx.roster.get_mut(&proposer_name) {
        proposer.set_flag(scenario_flags::EXCLUSIVITY_DEAL_SECURED, secured);
    }

    if secured {
        info!("Client decided in favor of {}'s exclusivity deal", proposer_name);
        for agent in ctx.roster.iter_mut().filter(|a| a.name() != proposer_name) {
            agent.adjust_trust(COMPETITOR_TRUST_PENALTY, Some(proposer_name.as_str()));
            agent.set_flag(scenario_flags::EXCLUSIVITY_DEAL_LOST, true);
        }
    } else {
        info!("Client rejected {}'s exclusivity deal", proposer_name);
    }
    Ok(())
}

/// Decision table entry for Experian agents; only the lead proposes
pub fn proposer_decide(
    agent: &Agent,
    ctx: &RoundContext<'_>,
    rng: &mut SmallRng,
) -> Result<Decision, SimError> {
    let state = ctx.state.exclusivity()?;
    if state.deal_proposed_by.as_deref() != Some(agent.name()) {
        return competitor_decide(agent, ctx, rng);
    }

    let decision = if ctx.round == 1 {
        debug!("{} proposes exclusivity deal", agent.name());
        Decision::hold()
            .with_vote(Vote::ProposeExclusivity)
            .with_incentive(Incentive::MarketShareDominance)
    } else if ctx.round == state.decision_round {
        if agent.flag(scenario_flags::EXCLUSIVITY_DEAL_SECURED) {
            debug!("{} secured the deal; market share increases", agent.name());
            Decision::hold().with_market_share_delta(PROPOSER_SHARE_GAIN)
        } else {
            debug!("{}'s exclusivity deal failed", agent.name());
            Decision::hold()
        }
    } else {
        Decision::hold()
    };
    Ok(decision)
}

/// Decision table entry for everyone reacting to the proposal
pub fn competitor_decide(
    agent: &Agent,
    ctx: &RoundContext<'_>,
    _rng: &mut SmallRng,
) -> Result<Decision, SimError> {
    let state = ctx.state.exclusivity()?;

    let decision = if ctx.round == 2 {
        let vote = if agent.trust_level() > COUNTER_OFFER_TRUST {
            Vote::CounterOfferExclusivity
        } else {
            Vote::UndermineExperianDeal
        };
        debug!("{} reacts to the gambit with {}", agent.name(), vote);
        Decision::hold()
            .with_incentive(Incentive::CompeteAggressively)
            .with_vote(vote)
    } else if ctx.round == state.decision_round && state.deal_secured != Some(true) {
        debug!("{} gains from the failed deal", agent.name());
        Decision::hold().with_market_share_delta(COMPETITOR_SHARE_GAIN)
    } else {
        Decision::hold()
    };
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn roster(experian_trust: f64, other_trust: f64) -> AgentRoster {
        let mut roster = AgentRoster::new();
        roster.insert(Agent::new("Experian", Bureau::Experian).with_trust(experian_trust));
        roster.insert(Agent::new("Equifax", Bureau::Equifax).with_trust(other_trust));
        roster.insert(Agent::new("TransUnion", Bureau::TransUnion).with_trust(other_trust));
        roster
    }

    fn run_hook(roster: &mut AgentRoster, state: &mut ScenarioState, round: u32, seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ctx = HookContext {
            round,
            total_rounds: 5,
            state,
            roster,
        };
        round_hook(&mut ctx, &mut rng).unwrap();
    }

    #[test]
    fn test_seed_picks_lead_experian() {
        let mut roster = roster(0.5, 0.5);
        let mut rng = SmallRng::seed_from_u64(1);
        let state = seed(&mut roster, &mut rng).unwrap();
        let state = state.exclusivity().unwrap();
        assert_eq!(state.deal_proposed_by.as_deref(), Some("Experian"));
        assert_eq!(state.deal_secured, None);
        assert_eq!(state.decision_round, 3);
    }

    #[test]
    fn test_deal_secured_penalizes_competitors() {
        let mut roster = roster(0.9, 0.4);
        roster.get_mut("Experian").unwrap().set_vote(Vote::ProposeExclusivity);
        let mut state = seed(&mut roster, &mut SmallRng::seed_from_u64(0)).unwrap();

        run_hook(&mut roster, &mut state, DECISION_ROUND, 5);

        assert_eq!(state.exclusivity().unwrap().deal_secured, Some(true));
        assert!(roster.get("Experian").unwrap().flag(scenario_flags::EXCLUSIVITY_DEAL_SECURED));
        let equifax = roster.get("Equifax").unwrap();
        assert!((equifax.trust_level() - 0.3).abs() < 1e-12);
        assert!(equifax.flag(scenario_flags::EXCLUSIVITY_DEAL_LOST));
    }

    #[test]
    fn test_no_proposal_means_no_deal() {
        let mut roster = roster(0.9, 0.4);
        let mut state = seed(&mut roster, &mut SmallRng::seed_from_u64(0)).unwrap();

        run_hook(&mut roster, &mut state, DECISION_ROUND, 5);

        assert_eq!(state.exclusivity().unwrap().deal_secured, Some(false));
        assert_eq!(roster.get("Equifax").unwrap().trust_level(), 0.4);
    }

    #[test]
    fn test_hook_idle_outside_decision_round() {
        let mut roster = roster(0.9, 0.4);
        let mut state = seed(&mut roster, &mut SmallRng::seed_from_u64(0)).unwrap();
        run_hook(&mut roster, &mut state, 2, 5);
        assert_eq!(state.exclusivity().unwrap().deal_secured, None);
    }

    #[test]
    fn test_client_decision_margins() {
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..500 {
            assert!(client_decides(0.75, true, 0.5, &mut rng));
            assert!(!client_decides(0.35, true, 0.5, &mut rng));
            assert!(!client_decides(1.0, false, 0.0, &mut rng));
        }
    }

    #[test]
    fn test_competitor_round_two_votes() {
        let roster = roster(0.5, 0.5);
        let state = ScenarioState::ExclusivityGambit(ExclusivityState {
            deal_proposed_by: Some("Experian".to_string()),
            ..ExclusivityState::default()
        });
        let ctx = RoundContext {
            round: 2,
            total_rounds: 5,
            state: &state,
        };
        let mut rng = SmallRng::seed_from_u64(0);

        let trusting = competitor_decide(roster.get("Equifax").unwrap(), &ctx, &mut rng).unwrap();
        assert_eq!(trusting.vote, Some(Vote::CounterOfferExclusivity));
        assert_eq!(trusting.incentive, Some(Incentive::CompeteAggressively));

        let wary = Agent::new("TransUnion", Bureau::TransUnion).with_trust(0.4);
        let wary = competitor_decide(&wary, &ctx, &mut rng).unwrap();
        assert_eq!(wary.vote, Some(Vote::UndermineExperianDeal));
    }

    #[test]
    fn test_second_experian_agent_competes() {
        let state = ScenarioState::ExclusivityGambit(ExclusivityState {
            deal_proposed_by: Some("Experian_1".to_string()),
            ..ExclusivityState::default()
        });
        let ctx = RoundContext {
            round: 1,
            total_rounds: 5,
            state: &state,
        };
        let mut rng = SmallRng::seed_from_u64(0);
        let second = Agent::new("Experian_2", Bureau::Experian);
        assert!(proposer_decide(&second, &ctx, &mut rng).unwrap().is_hold());
    }

    #[test]
    fn test_competitor_gains_when_deal_fails() {
        let state = ScenarioState::ExclusivityGambit(ExclusivityState {
            deal_proposed_by: Some("Experian".to_string()),
            deal_secured: Some(false),
            decision_round: DECISION_ROUND,
        });
        let ctx = RoundContext {
            round: DECISION_ROUND,
            total_rounds: 5,
            state: &state,
        };
        let mut rng = SmallRng::seed_from_u64(0);
        let agent = Agent::new("Equifax", Bureau::Equifax);
        let decision = competitor_decide(&agent, &ctx, &mut rng).unwrap();
        assert_eq!(decision.market_share_delta, COMPETITOR_SHARE_GAIN);
    }
}
