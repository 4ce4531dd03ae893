//! Shared tag and snapshot types for the credit-bureau simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is the compatibility surface between the engine and anything that
//! reports on a finished run.

pub mod scenario;
pub mod snapshot;
pub mod tags;

// Re-export scenario identifiers
pub use scenario::{ScenarioId, UnknownScenarioError};

// Re-export tag types
pub use tags::{Incentive, ParseTagError, Vote};

// Re-export snapshot types
pub use snapshot::{AgentSnapshot, ModelSnapshot, ScenarioFlags, SimulationRecord};
