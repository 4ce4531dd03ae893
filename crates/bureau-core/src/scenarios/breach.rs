//! Data Breach Response
//!
//! One bureau suffers a breach. Its lead agent moves through damage control,
//! security measures and trust rebuilding while the rest of the industry either
//! exploits the weakness or shows solidarity.

use bureau_events::{Incentive, Vote};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use super::{HookContext, ScenarioState};
use crate::components::agent::{scenario_flags, Agent, Bureau};
use crate::components::roster::AgentRoster;
use crate::error::{ConfigError, SimError};
use crate::systems::policy::{Decision, RoundContext};

pub const MIN_SEVERITY: f64 = 0.3;
pub const MAX_SEVERITY: f64 = 0.8;

/// Industry-wide trust shock per unit of severity
pub const INDUSTRY_TRUST_SHOCK: f64 = -0.3;

pub const BREACHED_TRUST_PENALTY: f64 = -0.5;
pub const BREACHED_SHARE_LOSS: f64 = -0.1;
pub const REBUILD_TRUST_GAIN: f64 = 0.05;
pub const OPPORTUNISTIC_SHARE_GAIN: f64 = 0.03;

#[derive(Debug, Clone, PartialEq)]
pub struct BreachState {
    pub breached_agent: String,
    pub breached_bureau: Bureau,
    pub breach_severity: f64,
}

pub fn seed(roster: &mut AgentRoster, rng: &mut SmallRng) -> Result<ScenarioState, SimError> {
    let bureaus = roster.present_bureaus();
    let bureau = *bureaus
        .choose(rng)
        .ok_or(SimError::Config(ConfigError::EmptyRoster))?;
    let severity = rng.gen_range(MIN_SEVERITY..=MAX_SEVERITY);

    let name = roster
        .lead(bureau)
        .map(|a| a.name().to_string())
        .ok_or(SimError::Config(ConfigError::EmptyRoster))?;
    if let Some(agent) = roster.get_mut(&name) {
        agent.set_flag(scenario_flags::IS_BREACHED, true);
    }

    info!("Data breach at {} with severity {:.2}", name, severity);
    Ok(ScenarioState::DataBreachResponse(BreachState {
        breached_agent: name,
        breached_bureau: bureau,
        breach_severity: severity,
    }))
}

pub fn round_hook(ctx: &mut HookContext<'_>, _rng: &mut SmallRng) -> Result<(), SimError> {
    let state = ctx.state.breach()?;

    if ctx.round == 1 {
        info!(
            "Data breach confirmed for {} with severity {:.2}",
            state.breached_agent, state.breach_severity
        );
        let shock = INDUSTRY_TRUST_SHOCK * state.breach_severity;
        for agent in ctx
            .roster
            .iter_mut()
            .filter(|a| a.name() != state.breached_agent)
        {
            agent.adjust_trust(shock, Some(state.breached_agent.as_str()));
        }
    } else if ctx.round == ctx.total_rounds {
        let trust = ctx
            .roster
            .get(&state.breached_agent)
            .map(|a| a.trust_level())
            .unwrap_or_default();
        info!(
            "Assessing long-term impact for {}: trust {:.2} entering final round",
            state.breached_agent, trust
        );
    }
    Ok(())
}

pub fn decide(
    agent: &Agent,
    ctx: &RoundContext<'_>,
    _rng: &mut SmallRng,
) -> Result<Decision, SimError> {
    let state = ctx.state.breach()?;
    let decision = if agent.flag(scenario_flags::IS_BREACHED) {
        breached_decision(agent, ctx.round)
    } else {
        bystander_decision(agent, ctx.round, &state.breached_agent)
    };
    Ok(decision)
}

fn breached_decision(agent: &Agent, round: u32) -> Decision {
    match round {
        0 => Decision::hold(),
        1 => {
            debug!("{} acknowledges the breach", agent.name());
            Decision::hold()
                .with_incentive(Incentive::DamageControl)
                .with_trust_delta(BREACHED_TRUST_PENALTY)
                .with_vote(Vote::AcknowledgeBreach)
                .with_market_share_delta(BREACHED_SHARE_LOSS)
        }
        2 => {
            debug!("{} implements security measures", agent.name());
            Decision::hold().with_vote(Vote::ImplementSecurityMeasures)
        }
        _ => {
            debug!("{} works to rebuild trust", agent.name());
            Decision::hold()
                .with_incentive(Incentive::RebuildTrust)
                .with_trust_delta(REBUILD_TRUST_GAIN)
        }
    }
}

fn bystander_decision(agent: &Agent, round: u32, breached: &str) -> Decision {
    match round {
        0 => Decision::hold(),
        1 if agent.current_incentive() == Incentive::ProfitMaximization => {
            debug!("{} moves to exploit {}'s breach", agent.name(), breached);
            Decision::hold()
                .with_incentive(Incentive::OpportunisticGrowth)
                .with_vote(Vote::ExploitCompetitorWeakness)
        }
        1 => {
            debug!("{} offers support to {}", agent.name(), breached);
            Decision::hold()
                .with_incentive(Incentive::IndustrySolidarity)
                .with_vote(Vote::OfferSupportToBreachedAgent)
        }
        _ if agent.current_incentive() == Incentive::OpportunisticGrowth => {
            Decision::hold().with_market_share_delta(OPPORTUNISTIC_SHARE_GAIN)
        }
        _ => Decision::hold(),
    }
}
