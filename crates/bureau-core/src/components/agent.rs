//! Agent Components
//!
//! Credit bureau agents: role variant, trust, incentive, vote, market share.

use bureau_events::{Incentive, Vote};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::systems::policy::Decision;

/// Trust level every agent starts with
pub const INITIAL_TRUST: f64 = 0.5;

/// Number of major bureaus sharing the market at creation
pub const BUREAU_COUNT: usize = 3;

/// Market share every agent starts with
pub const INITIAL_MARKET_SHARE: f64 = 1.0 / BUREAU_COUNT as f64;

/// Keys for per-agent scenario flags
pub mod scenario_flags {
    /// Agent is the victim of the data breach
    pub const IS_BREACHED: &str = "is_breached";
    /// Client accepted (true) or rejected (false) the proposer's exclusivity deal
    pub const EXCLUSIVITY_DEAL_SECURED: &str = "exclusivity_deal_secured";
    /// Competitor lost out to the proposer's exclusivity deal
    pub const EXCLUSIVITY_DEAL_LOST: &str = "exclusivity_deal_lost";
}

/// The role variant of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bureau {
    Experian,
    Equifax,
    TransUnion,
}

impl Bureau {
    /// Display name, also the agent name when a bureau fields a single agent
    pub fn name(&self) -> &'static str {
        match self {
            Bureau::Experian => "Experian",
            Bureau::Equifax => "Equifax",
            Bureau::TransUnion => "TransUnion",
        }
    }

    /// Incentive the bureau holds outside of any scenario
    pub fn initial_incentive(&self) -> Incentive {
        match self {
            Bureau::Experian => Incentive::ProfitMaximization,
            Bureau::Equifax => Incentive::MarketShareExpansion,
            Bureau::TransUnion => Incentive::DataSecurityFocus,
        }
    }

    pub fn all() -> &'static [Bureau] {
        &[Bureau::Experian, Bureau::Equifax, Bureau::TransUnion]
    }
}

impl fmt::Display for Bureau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single credit bureau agent
///
/// Trust is kept private so every write goes through the clamp in
/// [`Agent::adjust_trust`].
#[derive(Debug, Clone, Serialize)]
pub struct Agent {
    name: String,
    bureau: Bureau,
    initial_incentive: Incentive,
    current_incentive: Incentive,
    trust_level: f64,
    vote: Option<Vote>,
    market_share: f64,
    scenario_data: BTreeMap<String, bool>,
}

impl Agent {
    pub fn new(name: impl Into<String>, bureau: Bureau) -> Self {
        Self {
            name: name.into(),
            bureau,
            initial_incentive: bureau.initial_incentive(),
            current_incentive: bureau.initial_incentive(),
            trust_level: INITIAL_TRUST,
            vote: None,
            market_share: INITIAL_MARKET_SHARE,
            scenario_data: BTreeMap::new(),
        }
    }

    /// Override the starting trust level (clamped into [0, 1])
    pub fn with_trust(mut self, trust_level: f64) -> Self {
        self.trust_level = trust_level.clamp(0.0, 1.0);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bureau(&self) -> Bureau {
        self.bureau
    }

    pub fn initial_incentive(&self) -> Incentive {
        self.initial_incentive
    }

    pub fn current_incentive(&self) -> Incentive {
        self.current_incentive
    }

    pub fn trust_level(&self) -> f64 {
        self.trust_level
    }

    pub fn vote(&self) -> Option<Vote> {
        self.vote
    }

    pub fn market_share(&self) -> f64 {
        self.market_share
    }

    /// Read a scenario flag; unset flags read as false
    pub fn flag(&self, key: &str) -> bool {
        self.scenario_data.get(key).copied().unwrap_or(false)
    }

    pub fn scenario_data(&self) -> &BTreeMap<String, bool> {
        &self.scenario_data
    }

    /// Adjust generalized trust by `change`, clamping into [0, 1].
    ///
    /// `regarding` names the counterpart that prompted the change, if any.
    /// Trust stays a single scalar; the counterpart is only logged.
    pub fn adjust_trust(&mut self, change: f64, regarding: Option<&str>) {
        self.trust_level = (self.trust_level + change).clamp(0.0, 1.0);
        debug!(
            "{} trust adjusted by {:.2} to {:.2} regarding {}",
            self.name,
            change,
            self.trust_level,
            regarding.unwrap_or("the system")
        );
    }

    pub fn update_incentive(&mut self, incentive: Incentive) {
        self.current_incentive = incentive;
    }

    pub fn set_vote(&mut self, vote: Vote) {
        self.vote = Some(vote);
    }

    /// Additive market share change; shares are never renormalized
    pub fn adjust_market_share(&mut self, delta: f64) {
        self.market_share += delta;
    }

    pub fn set_flag(&mut self, key: impl Into<String>, value: bool) {
        self.scenario_data.insert(key.into(), value);
    }

    /// Restore incentive, vote and scenario data to their out-of-scenario values
    pub fn reset_for_scenario(&mut self) {
        self.vote = None;
        self.current_incentive = self.initial_incentive;
        self.scenario_data.clear();
    }

    /// Apply a round decision to this agent's state
    pub fn apply(&mut self, decision: Decision) {
        if let Some(incentive) = decision.incentive {
            self.update_incentive(incentive);
        }
        if let Some(vote) = decision.vote {
            self.set_vote(vote);
        }
        if decision.trust_delta != 0.0 {
            self.adjust_trust(decision.trust_delta, None);
        }
        if decision.market_share_delta != 0.0 {
            self.adjust_market_share(decision.market_share_delta);
        }
        for (key, value) in decision.scenario_data {
            self.set_flag(key, value);
        }
    }
}
