//! Simulation Orchestrator
//!
//! Owns the agents, the active scenario and the round counters, and drives the
//! round loop: round hook, scheduler, snapshot, then the conclusion check.

use bureau_events::{ScenarioId, SimulationRecord};
use rand::rngs::SmallRng;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::components::agent::Agent;
use crate::components::roster::AgentRoster;
use crate::config::Config;
use crate::error::{ConfigError, SimError};
use crate::output::DataCollector;
use crate::scenarios::{spec_for, HookContext, ScenarioSpec, ScenarioState};
use crate::setup::spawn_roster;
use crate::systems::policy::{RoundContext, RoundPolicy};
use crate::systems::scheduler::RandomActivation;

/// A single simulation run
#[derive(Debug)]
pub struct Simulation {
    agents: AgentRoster,
    active: Option<&'static ScenarioSpec>,
    current_round: u32,
    total_rounds: u32,
    scenario_states: BTreeMap<ScenarioId, ScenarioState>,
    scheduler: RandomActivation,
    collector: DataCollector,
    rng: SmallRng,
    running: bool,
}

impl Simulation {
    /// Build a simulation from configuration.
    ///
    /// With a scenario id, the id must resolve through the configured catalog and
    /// `rounds` overrides the catalog's round count. Without one, the simulation
    /// runs default-policy steps, capped at `max_default_steps`.
    pub fn new(
        config: &Config,
        scenario_id: Option<&str>,
        rounds: Option<u32>,
        rng: SmallRng,
    ) -> Result<Self, SimError> {
        config.validate()?;
        match scenario_id {
            Some(id) => {
                let (scenario, default_rounds) = config.scenarios.resolve(id)?;
                let rounds = rounds.unwrap_or(default_rounds);
                Self::with_spec(config, spec_for(scenario), rounds, rng)
            }
            None => {
                let cap = config.simulation.max_default_steps;
                let steps = rounds.map_or(cap, |r| r.min(cap));
                if steps == 0 {
                    return Err(ConfigError::InvalidRoundCount {
                        scenario: "none".to_string(),
                        rounds: 0,
                    }
                    .into());
                }
                let mut sim = Self::empty(config, rng)?;
                sim.total_rounds = steps;
                sim.running = true;
                info!("Running {} default steps with {} agents", steps, sim.agents.len());
                Ok(sim)
            }
        }
    }

    /// Build a simulation that runs an explicit scenario definition
    pub fn with_spec(
        config: &Config,
        spec: &'static ScenarioSpec,
        rounds: u32,
        rng: SmallRng,
    ) -> Result<Self, SimError> {
        if rounds == 0 {
            return Err(ConfigError::InvalidRoundCount {
                scenario: spec.id.to_string(),
                rounds,
            }
            .into());
        }
        let mut sim = Self::empty(config, rng)?;
        sim.initialize_scenario(spec, rounds)?;
        Ok(sim)
    }

    fn empty(config: &Config, rng: SmallRng) -> Result<Self, SimError> {
        Ok(Self {
            agents: spawn_roster(&config.agents)?,
            active: None,
            current_round: 0,
            total_rounds: 0,
            scenario_states: BTreeMap::new(),
            scheduler: RandomActivation::new(),
            collector: DataCollector::new(),
            rng,
            running: false,
        })
    }

    /// Reset every agent, then seed the scenario's state
    fn initialize_scenario(
        &mut self,
        spec: &'static ScenarioSpec,
        rounds: u32,
    ) -> Result<(), SimError> {
        self.current_round = 0;
        self.total_rounds = rounds;
        for agent in self.agents.iter_mut() {
            agent.reset_for_scenario();
        }

        let state = (spec.seed)(&mut self.agents, &mut self.rng)?;
        if state.id() != spec.id {
            return Err(SimError::StateMismatch {
                expected: spec.id,
                found: state.id(),
            });
        }
        self.scenario_states.insert(spec.id, state);
        self.active = Some(spec);
        self.scheduler.reset();
        self.running = true;
        info!("Scenario '{}' initialized for {} rounds", spec.id, rounds);
        Ok(())
    }

    /// Advance one round
    pub fn step(&mut self) -> Result<(), SimError> {
        if !self.running {
            return Ok(());
        }
        self.current_round += 1;
        match self.active {
            Some(spec) => self.scenario_round(spec),
            None => self.default_round(),
        }
    }

    fn scenario_round(&mut self, spec: &'static ScenarioSpec) -> Result<(), SimError> {
        let round = self.current_round;
        let total_rounds = self.total_rounds;
        debug!("Scenario '{}' round {}/{}", spec.id, round, total_rounds);

        let state = self
            .scenario_states
            .get_mut(&spec.id)
            .ok_or(SimError::MissingScenarioState(spec.id))?;

        let hooked = match spec.round_hook {
            Some(hook) => {
                let mut ctx = HookContext {
                    round,
                    total_rounds,
                    state: &mut *state,
                    roster: &mut self.agents,
                };
                hook(&mut ctx, &mut self.rng)?;
                true
            }
            None => {
                warn!(
                    "No round hook for scenario '{}'; agents use default behavior",
                    spec.id
                );
                false
            }
        };

        let policy = if hooked {
            RoundPolicy::Scenario {
                spec,
                ctx: RoundContext {
                    round,
                    total_rounds,
                    state: &*state,
                },
            }
        } else {
            RoundPolicy::Default
        };
        self.scheduler.step(&mut self.agents, &policy, &mut self.rng)?;
        self.collector
            .collect(round, Some(spec.id), Some(&*state), &self.agents);

        if round >= total_rounds {
            self.conclude_scenario(spec.id);
        }
        Ok(())
    }

    fn default_round(&mut self) -> Result<(), SimError> {
        self.scheduler
            .step(&mut self.agents, &RoundPolicy::Default, &mut self.rng)?;
        self.collector
            .collect(self.current_round, None, None, &self.agents);
        if self.scheduler.steps() >= self.total_rounds {
            info!("Default run halted after {} steps", self.scheduler.steps());
            self.running = false;
        }
        Ok(())
    }

    fn conclude_scenario(&mut self, id: ScenarioId) {
        info!("Scenario '{}' concluded after {} rounds", id, self.current_round);
        self.active = None;
        self.current_round = 0;
        for agent in self.agents.iter_mut() {
            agent.reset_for_scenario();
        }
        self.running = false;
    }

    /// Run to completion and hand back the record.
    ///
    /// A failing round abandons the run; snapshots gathered so far are dropped.
    pub fn run(mut self) -> Result<SimulationRecord, SimError> {
        while self.running {
            let round = self.current_round + 1;
            self.step().map_err(|e| SimError::RoundFault {
                round,
                source: Box::new(e),
            })?;
        }
        Ok(self.collector.into_record())
    }

    pub fn current_scenario(&self) -> Option<ScenarioId> {
        self.active.map(|spec| spec.id)
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn agents(&self) -> &AgentRoster {
        &self.agents
    }

    pub fn get_agent(&self, name: &str) -> Result<&Agent, SimError> {
        self.agents
            .get(name)
            .ok_or_else(|| SimError::AgentNotFound(name.to_string()))
    }

    pub fn scenario_state(&self, id: ScenarioId) -> Option<&ScenarioState> {
        self.scenario_states.get(&id)
    }

    /// Snapshots recorded so far
    pub fn record(&self) -> &SimulationRecord {
        self.collector.record()
    }
}
