//! Round Systems
//!
//! Per-agent decision policies and the activation scheduler that runs them.

pub mod policy;
pub mod scheduler;

pub use policy::{default_policy, Decision, RoundContext, RoundPolicy};
pub use scheduler::RandomActivation;
