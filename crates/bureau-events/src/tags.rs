//! Vote and Incentive Tags
//!
//! The literal string tags agents emit each round. Reporting pattern-matches
//! on these exact values, so the snake_case spellings are a stable contract.
//!
//! # Example
//!
//! ```
//! use bureau_events::{Incentive, Vote};
//!
//! assert_eq!(Vote::ProposeExclusivity.as_str(), "propose_exclusivity");
//! assert_eq!("damage_control".parse::<Incentive>().unwrap(), Incentive::DamageControl);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing a tag from a string.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseTagError {
    UnknownVote(String),
    UnknownIncentive(String),
}

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseTagError::UnknownVote(s) => write!(f, "unknown vote tag: '{}'", s),
            ParseTagError::UnknownIncentive(s) => write!(f, "unknown incentive tag: '{}'", s),
        }
    }
}

impl std::error::Error for ParseTagError {}

/// Declares a tag enum with its literal spelling, `all()`, `Display` and `FromStr`.
macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $err:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Returns the literal tag.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $tag, )+
                }
            }

            /// Returns all variants in declaration order.
            pub fn all() -> &'static [$name] {
                &[ $( $name::$variant, )+ ]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseTagError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $tag => Ok($name::$variant), )+
                    _ => Err(ParseTagError::$err(s.to_string())),
                }
            }
        }
    };
}

tag_enum! {
    /// An agent's action tag for the current round.
    ///
    /// Votes persist across rounds until a decision overwrites them; the
    /// "unset" state is represented as `Option::<Vote>::None`.
    Vote, UnknownVote {
        Yes => "yes",
        No => "no",
        Abstain => "abstain",
        ProposeExclusivity => "propose_exclusivity",
        CounterOfferExclusivity => "counter_offer_exclusivity",
        UndermineExperianDeal => "undermine_experian_deal",
        AcknowledgeBreach => "acknowledge_breach",
        ImplementSecurityMeasures => "implement_security_measures",
        ExploitCompetitorWeakness => "exploit_competitor_weakness",
        OfferSupportToBreachedAgent => "offer_support_to_breached_agent",
        AcceptAllianceProposal => "accept_alliance_proposal",
        RejectAllianceProposal => "reject_alliance_proposal",
        ObserveAllianceFormation => "observe_alliance_formation",
        CounterAllianceStrategy => "counter_alliance_strategy",
    }
}

impl Vote {
    /// Returns true for the three generic ballot votes counted in model tallies.
    pub fn is_ballot(&self) -> bool {
        matches!(self, Vote::Yes | Vote::No | Vote::Abstain)
    }
}

tag_enum! {
    /// An agent's current strategic motivation.
    Incentive, UnknownIncentive {
        // Initial incentives, one per bureau
        ProfitMaximization => "profit_maximization",
        MarketShareExpansion => "market_share_expansion",
        DataSecurityFocus => "data_security_focus",
        // Exclusivity gambit
        MarketShareDominance => "market_share_dominance",
        CompeteAggressively => "compete_aggressively",
        // Data breach response
        DamageControl => "damage_control",
        RebuildTrust => "rebuild_trust",
        OpportunisticGrowth => "opportunistic_growth",
        IndustrySolidarity => "industry_solidarity",
        // New entrant alliance
        StrategicPartnershipAssessment => "strategic_partnership_assessment",
        CompetitiveResponseToAlliance => "competitive_response_to_alliance",
    }
}
