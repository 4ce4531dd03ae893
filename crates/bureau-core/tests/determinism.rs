//! Determinism verification tests
//!
//! Tests to ensure a simulation produces identical records given the same seed.

use bureau_core::config::Config;
use bureau_core::Simulation;
use bureau_events::{ScenarioId, SimulationRecord};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn record(scenario: Option<&str>, seed: u64) -> SimulationRecord {
    Simulation::new(&Config::default(), scenario, None, SmallRng::seed_from_u64(seed))
        .unwrap()
        .run()
        .unwrap()
}

/// Same seed, same record, for every scenario
#[test]
fn test_same_seed_same_record() {
    for scenario in ScenarioId::all() {
        for seed in [0u64, 42, 12345] {
            let first = record(Some(scenario.as_str()), seed);
            let second = record(Some(scenario.as_str()), seed);
            assert_eq!(first, second, "{} diverged for seed {}", scenario, seed);
        }
    }
}

/// Default-policy runs draw from the same stream and replay identically
#[test]
fn test_default_mode_determinism() {
    assert_eq!(record(None, 7), record(None, 7));
}

/// Scenario seeding depends on the seed
#[test]
fn test_different_seeds_vary_breach_target() {
    let targets: std::collections::HashSet<String> = (0..30)
        .filter_map(|seed| {
            record(Some("data_breach_response"), seed)
                .model_at_round(1)
                .and_then(|m| m.flags.breached_agent.clone())
        })
        .collect();
    assert!(targets.len() > 1, "breach target never varied across seeds");
}

/// JSON output is byte-identical between replays
#[test]
fn test_serialized_record_is_stable() {
    let first = record(Some("new_entrant_alliance"), 99).to_json_pretty().unwrap();
    let second = record(Some("new_entrant_alliance"), 99).to_json_pretty().unwrap();
    assert_eq!(first, second);

    let parsed = SimulationRecord::from_json(&first).unwrap();
    assert_eq!(parsed, record(Some("new_entrant_alliance"), 99));
}
