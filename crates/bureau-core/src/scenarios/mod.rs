//! Scenario Engine
//!
//! Every scenario is a compiled [`ScenarioSpec`]: a seeding routine, an
//! optional round hook for environment-level effects, and a decision table
//! mapping each bureau to its per-round decision function.
//!
//! Adding a scenario means adding a module, a [`ScenarioState`] variant and a
//! static spec; existing scenarios are untouched.

pub mod alliance;
pub mod breach;
pub mod exclusivity;

use bureau_events::{ScenarioFlags, ScenarioId};
use rand::rngs::SmallRng;
use std::fmt;

use crate::components::agent::{Agent, Bureau};
use crate::components::roster::AgentRoster;
use crate::error::SimError;
use crate::systems::policy::{Decision, RoundContext};

pub use alliance::AllianceState;
pub use breach::BreachState;
pub use exclusivity::ExclusivityState;

/// Per-bureau decision function for one scenario
pub type DecideFn = fn(&Agent, &RoundContext<'_>, &mut SmallRng) -> Result<Decision, SimError>;

/// Creates the scenario state; runs after every agent has been reset
pub type SeedFn = fn(&mut AgentRoster, &mut SmallRng) -> Result<ScenarioState, SimError>;

/// Environment-level effects applied at the start of a round, before any agent acts
pub type RoundHook = fn(&mut HookContext<'_>, &mut SmallRng) -> Result<(), SimError>;

/// Mutable view handed to a round hook
pub struct HookContext<'a> {
    pub round: u32,
    pub total_rounds: u32,
    pub state: &'a mut ScenarioState,
    pub roster: &'a mut AgentRoster,
}

/// Decision functions keyed by bureau; `None` falls back to the default policy
#[derive(Clone, Copy)]
pub struct DecisionTable {
    pub experian: Option<DecideFn>,
    pub equifax: Option<DecideFn>,
    pub transunion: Option<DecideFn>,
}

impl DecisionTable {
    /// Table with no entries
    pub const EMPTY: DecisionTable = DecisionTable {
        experian: None,
        equifax: None,
        transunion: None,
    };

    /// Same function for every bureau
    pub const fn uniform(decide: DecideFn) -> Self {
        Self {
            experian: Some(decide),
            equifax: Some(decide),
            transunion: Some(decide),
        }
    }

    pub fn entry(&self, bureau: Bureau) -> Option<DecideFn> {
        match bureau {
            Bureau::Experian => self.experian,
            Bureau::Equifax => self.equifax,
            Bureau::TransUnion => self.transunion,
        }
    }
}

impl fmt::Debug for DecisionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionTable")
            .field("experian", &self.experian.is_some())
            .field("equifax", &self.equifax.is_some())
            .field("transunion", &self.transunion.is_some())
            .finish()
    }
}

/// A compiled scenario definition
pub struct ScenarioSpec {
    pub id: ScenarioId,
    pub seed: SeedFn,
    pub round_hook: Option<RoundHook>,
    pub decisions: DecisionTable,
}

impl fmt::Debug for ScenarioSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioSpec")
            .field("id", &self.id)
            .field("round_hook", &self.round_hook.is_some())
            .field("decisions", &self.decisions)
            .finish()
    }
}

pub static EXCLUSIVITY_GAMBIT: ScenarioSpec = ScenarioSpec {
    id: ScenarioId::ExclusivityGambit,
    seed: exclusivity::seed,
    round_hook: Some(exclusivity::round_hook),
    decisions: DecisionTable {
        experian: Some(exclusivity::proposer_decide),
        equifax: Some(exclusivity::competitor_decide),
        transunion: Some(exclusivity::competitor_decide),
    },
};

pub static DATA_BREACH_RESPONSE: ScenarioSpec = ScenarioSpec {
    id: ScenarioId::DataBreachResponse,
    seed: breach::seed,
    round_hook: Some(breach::round_hook),
    decisions: DecisionTable::uniform(breach::decide),
};

pub static NEW_ENTRANT_ALLIANCE: ScenarioSpec = ScenarioSpec {
    id: ScenarioId::NewEntrantAlliance,
    seed: alliance::seed,
    round_hook: Some(alliance::round_hook),
    decisions: DecisionTable::uniform(alliance::decide),
};

/// Resolve a scenario identifier to its compiled definition
pub fn spec_for(id: ScenarioId) -> &'static ScenarioSpec {
    match id {
        ScenarioId::ExclusivityGambit => &EXCLUSIVITY_GAMBIT,
        ScenarioId::DataBreachResponse => &DATA_BREACH_RESPONSE,
        ScenarioId::NewEntrantAlliance => &NEW_ENTRANT_ALLIANCE,
    }
}

/// Scenario-scoped dynamic values, one variant per scenario
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioState {
    ExclusivityGambit(ExclusivityState),
    DataBreachResponse(BreachState),
    NewEntrantAlliance(AllianceState),
}

impl ScenarioState {
    pub fn id(&self) -> ScenarioId {
        match self {
            ScenarioState::ExclusivityGambit(_) => ScenarioId::ExclusivityGambit,
            ScenarioState::DataBreachResponse(_) => ScenarioId::DataBreachResponse,
            ScenarioState::NewEntrantAlliance(_) => ScenarioId::NewEntrantAlliance,
        }
    }

    /// Values surfaced on the model snapshot
    pub fn flags(&self) -> ScenarioFlags {
        match self {
            ScenarioState::ExclusivityGambit(s) => ScenarioFlags {
                exclusivity_deal_secured: s.deal_secured,
                ..ScenarioFlags::default()
            },
            ScenarioState::DataBreachResponse(s) => ScenarioFlags {
                breached_agent: Some(s.breached_agent.clone()),
                breach_severity: Some(s.breach_severity),
                ..ScenarioFlags::default()
            },
            ScenarioState::NewEntrantAlliance(s) => ScenarioFlags {
                alliance_target: Some(s.alliance_target.clone()),
                entrant_strength: Some(s.entrant_strength),
                alliance_formed: Some(s.alliance_formed),
                ..ScenarioFlags::default()
            },
        }
    }

    fn mismatch(&self, expected: ScenarioId) -> SimError {
        SimError::StateMismatch {
            expected,
            found: self.id(),
        }
    }

    pub fn exclusivity(&self) -> Result<&ExclusivityState, SimError> {
        match self {
            ScenarioState::ExclusivityGambit(s) => Ok(s),
            other => Err(other.mismatch(ScenarioId::ExclusivityGambit)),
        }
    }

    pub fn exclusivity_mut(&mut self) -> Result<&mut ExclusivityState, SimError> {
        match self {
            ScenarioState::ExclusivityGambit(s) => Ok(s),
            other => Err(other.mismatch(ScenarioId::ExclusivityGambit)),
        }
    }

    pub fn breach(&self) -> Result<&BreachState, SimError> {
        match self {
            ScenarioState::DataBreachResponse(s) => Ok(s),
            other => Err(other.mismatch(ScenarioId::DataBreachResponse)),
        }
    }

    pub fn breach_mut(&mut self) -> Result<&mut BreachState, SimError> {
        match self {
            ScenarioState::DataBreachResponse(s) => Ok(s),
            other => Err(other.mismatch(ScenarioId::DataBreachResponse)),
        }
    }

    pub fn alliance(&self) -> Result<&AllianceState, SimError> {
        match self {
            ScenarioState::NewEntrantAlliance(s) => Ok(s),
            other => Err(other.mismatch(ScenarioId::NewEntrantAlliance)),
        }
    }

    pub fn alliance_mut(&mut self) -> Result<&mut AllianceState, SimError> {
        match self {
            ScenarioState::NewEntrantAlliance(s) => Ok(s),
            other => Err(other.mismatch(ScenarioId::NewEntrantAlliance)),
        }
    }
}
