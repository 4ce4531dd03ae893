//! Output Generation
//!
//! Round snapshots and record export.

pub mod collector;

pub use collector::{write_record, DataCollector};
