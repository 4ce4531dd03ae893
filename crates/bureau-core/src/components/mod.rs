//! Simulation Components
//!
//! Agents and the roster that owns them.

pub mod agent;
pub mod roster;

pub use agent::*;
pub use roster::*;
