//! New Entrant Alliance
//!
//! A fintech startup courts one bureau. The target weighs the entrant's
//! strength in round 1; the alliance forms or fails in round 2 and the rest
//! of the market responds.

use bureau_events::{Incentive, Vote};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use super::{HookContext, ScenarioState};
use crate::components::agent::{Agent, Bureau};
use crate::components::roster::AgentRoster;
use crate::error::{ConfigError, SimError};
use crate::systems::policy::{Decision, RoundContext};

pub const NEW_ENTRANT_NAME: &str = "FinDataInnovate";

pub const MIN_STRENGTH: f64 = 0.4;
pub const MAX_STRENGTH: f64 = 0.7;

/// Entrant strength above which the target accepts
pub const ACCEPT_THRESHOLD: f64 = 0.6;

/// Round the alliance is resolved in
pub const FORMATION_ROUND: u32 = 2;

pub const ACCEPT_TRUST_GAIN: f64 = 0.1;
/// Share gained per unit of entrant strength once allied
pub const ALLIANCE_SHARE_FACTOR: f64 = 0.05;
/// Trust gained by the target per unit of entrant strength when the alliance forms
pub const FORMATION_TRUST_FACTOR: f64 = 0.1;
pub const RIVAL_TRUST_PENALTY: f64 = -0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct AllianceState {
    pub new_entrant_name: String,
    /// Lead agent of the courted bureau
    pub alliance_target: String,
    pub target_bureau: Bureau,
    pub entrant_strength: f64,
    pub alliance_formed: bool,
}

pub fn seed(roster: &mut AgentRoster, rng: &mut SmallRng) -> Result<ScenarioState, SimError> {
    let bureaus = roster.present_bureaus();
    let bureau = *bureaus
        .choose(rng)
        .ok_or(SimError::Config(ConfigError::EmptyRoster))?;
    let strength = rng.gen_range(MIN_STRENGTH..=MAX_STRENGTH);
    let target = roster
        .lead(bureau)
        .map(|a| a.name().to_string())
        .ok_or(SimError::Config(ConfigError::EmptyRoster))?;

    info!(
        "{} proposes an alliance to {} (strength {:.2})",
        NEW_ENTRANT_NAME, target, strength
    );
    Ok(ScenarioState::NewEntrantAlliance(AllianceState {
        new_entrant_name: NEW_ENTRANT_NAME.to_string(),
        alliance_target: target,
        target_bureau: bureau,
        entrant_strength: strength,
        alliance_formed: false,
    }))
}

pub fn round_hook(ctx: &mut HookContext<'_>, _rng: &mut SmallRng) -> Result<(), SimError> {
    if ctx.round != FORMATION_ROUND {
        return Ok(());
    }
    let state = ctx.state.alliance_mut()?;
    let accepted = ctx
        .roster
        .get(&state.alliance_target)
        .is_some_and(|a| a.vote() == Some(Vote::AcceptAllianceProposal));

    if !accepted {
        state.alliance_formed = false;
        info!("Alliance proposal rejected by {}", state.alliance_target);
        return Ok(());
    }

    state.alliance_formed = true;
    info!(
        "Alliance formed between {} and {}",
        state.alliance_target, state.new_entrant_name
    );
    for agent in ctx.roster.iter_mut() {
        if agent.name() == state.alliance_target {
            agent.adjust_trust(FORMATION_TRUST_FACTOR * state.entrant_strength, None);
        } else {
            agent.adjust_trust(RIVAL_TRUST_PENALTY, Some(state.alliance_target.as_str()));
        }
    }
    Ok(())
}

pub fn decide(
    agent: &Agent,
    ctx: &RoundContext<'_>,
    _rng: &mut SmallRng,
) -> Result<Decision, SimError> {
    let state = ctx.state.alliance()?;
    let decision = if agent.name() == state.alliance_target {
        target_decision(agent, ctx.round, state)
    } else {
        rival_decision(agent, ctx.round, state)
    };
    Ok(decision)
}

fn target_decision(agent: &Agent, round: u32, state: &AllianceState) -> Decision {
    match round {
        1 => {
            let assess = Decision::hold().with_incentive(Incentive::StrategicPartnershipAssessment);
            if state.entrant_strength > ACCEPT_THRESHOLD {
                debug!("{} accepts {}'s proposal", agent.name(), state.new_entrant_name);
                assess
                    .with_vote(Vote::AcceptAllianceProposal)
                    .with_trust_delta(ACCEPT_TRUST_GAIN)
            } else {
                debug!("{} rejects {}'s proposal", agent.name(), state.new_entrant_name);
                assess.with_vote(Vote::RejectAllianceProposal)
            }
        }
        FORMATION_ROUND if agent.vote() == Some(Vote::AcceptAllianceProposal) => {
            Decision::hold().with_market_share_delta(ALLIANCE_SHARE_FACTOR * state.entrant_strength)
        }
        _ => Decision::hold(),
    }
}

fn rival_decision(agent: &Agent, round: u32, state: &AllianceState) -> Decision {
    match round {
        1 => {
            debug!("{} observes {}'s potential alliance", agent.name(), state.alliance_target);
            Decision::hold()
                .with_incentive(Incentive::CompetitiveResponseToAlliance)
                .with_vote(Vote::ObserveAllianceFormation)
        }
        FORMATION_ROUND if state.alliance_formed => {
            debug!("{} plans a counter-strategy", agent.name());
            Decision::hold()
                .with_vote(Vote::CounterAllianceStrategy)
                .with_trust_delta(RIVAL_TRUST_PENALTY)
        }
        _ => Decision::hold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn state(strength: f64, formed: bool) -> AllianceState {
        AllianceState {
            new_entrant_name: NEW_ENTRANT_NAME.to_string(),
            alliance_target: "TransUnion".to_string(),
            target_bureau: Bureau::TransUnion,
            entrant_strength: strength,
            alliance_formed: formed,
        }
    }

    fn roster() -> AgentRoster {
        let mut roster = AgentRoster::new();
        for &bureau in Bureau::all() {
            roster.insert(Agent::new(bureau.name(), bureau));
        }
        roster
    }

    #[test]
    fn test_seed_strength_in_range() {
        for seed_value in 0..50 {
            let mut roster = roster();
            let mut rng = SmallRng::seed_from_u64(seed_value);
            let state = seed(&mut roster, &mut rng).unwrap();
            let state = state.alliance().unwrap();
            assert!((MIN_STRENGTH..=MAX_STRENGTH).contains(&state.entrant_strength));
            assert!(roster.get(&state.alliance_target).is_some());
            assert!(!state.alliance_formed);
            assert_eq!(state.new_entrant_name, "FinDataInnovate");
        }
    }

    #[test]
    fn test_target_accepts_strong_entrant() {
        let agent = Agent::new("TransUnion", Bureau::TransUnion);
        let decision = target_decision(&agent, 1, &state(0.65, false));
        assert_eq!(decision.vote, Some(Vote::AcceptAllianceProposal));
        assert_eq!(decision.trust_delta, ACCEPT_TRUST_GAIN);
        assert_eq!(
            decision.incentive,
            Some(Incentive::StrategicPartnershipAssessment)
        );

        let decision = target_decision(&agent, 1, &state(0.6, false));
        assert_eq!(decision.vote, Some(Vote::RejectAllianceProposal));
        assert_eq!(decision.trust_delta, 0.0);
    }

    #[test]
    fn test_target_gains_share_after_accepting() {
        let mut agent = Agent::new("TransUnion", Bureau::TransUnion);
        agent.set_vote(Vote::AcceptAllianceProposal);
        let decision = target_decision(&agent, FORMATION_ROUND, &state(0.7, true));
        assert!((decision.market_share_delta - 0.035).abs() < 1e-12);
    }

    #[test]
    fn test_rivals_counter_only_when_formed() {
        let agent = Agent::new("Equifax", Bureau::Equifax);
        assert!(rival_decision(&agent, FORMATION_ROUND, &state(0.5, false)).is_hold());

        let counter = rival_decision(&agent, FORMATION_ROUND, &state(0.65, true));
        assert_eq!(counter.vote, Some(Vote::CounterAllianceStrategy));
        assert_eq!(counter.trust_delta, RIVAL_TRUST_PENALTY);
    }

    #[test]
    fn test_hook_forms_alliance_on_acceptance() {
        let mut roster = roster();
        roster
            .get_mut("TransUnion")
            .unwrap()
            .set_vote(Vote::AcceptAllianceProposal);
        let mut scenario = ScenarioState::NewEntrantAlliance(state(0.65, false));
        let mut rng = SmallRng::seed_from_u64(0);
        let mut ctx = HookContext {
            round: FORMATION_ROUND,
            total_rounds: 5,
            state: &mut scenario,
            roster: &mut roster,
        };
        round_hook(&mut ctx, &mut rng).unwrap();

        assert!(scenario.alliance().unwrap().alliance_formed);
        assert!((roster.get("TransUnion").unwrap().trust_level() - 0.565).abs() < 1e-12);
        assert!((roster.get("Experian").unwrap().trust_level() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_hook_leaves_alliance_unformed_on_rejection() {
        let mut roster = roster();
        roster
            .get_mut("TransUnion")
            .unwrap()
            .set_vote(Vote::RejectAllianceProposal);
        let mut scenario = ScenarioState::NewEntrantAlliance(state(0.5, false));
        let mut rng = SmallRng::seed_from_u64(0);
        let mut ctx = HookContext {
            round: FORMATION_ROUND,
            total_rounds: 5,
            state: &mut scenario,
            roster: &mut roster,
        };
        round_hook(&mut ctx, &mut rng).unwrap();

        assert!(!scenario.alliance().unwrap().alliance_formed);
        assert_eq!(roster.get("Experian").unwrap().trust_level(), 0.5);
    }
}
