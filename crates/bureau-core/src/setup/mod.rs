//! Simulation Setup
//!
//! Agent spawning.

pub mod agents;

pub use agents::*;
