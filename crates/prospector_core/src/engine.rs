//! Episode controller: reset, step, and the sticky finished flag.

use crate::actions::Action;
use crate::dispatch::{dispatch, Dispatch};
use crate::dynamics::{apply_global_dynamics, apply_hold};
use crate::metrics::StepMetrics;
use crate::observation::{encode, Observation};
use crate::reward::{Outcome, RewardTerms, Snapshot};
use crate::rng::Pcg32;
use crate::world::{generate_market, generate_world};
use crate::{EngineConfig, EpisodeStats, Ship, SimState};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether the ship ended the tick docked or out in the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeContext {
    Station,
    Field,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub obs: Observation,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub invalid_action: bool,
    pub dt: u16,
    /// Code actually executed; out-of-range codes resolve to hold, `-1` after the episode ended.
    pub resolved_action: i16,
    pub metrics: StepMetrics,
    pub reward_terms: RewardTerms,
    pub time_remaining: f32,
    pub node_context: NodeContext,
}

impl StepResult {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// One simulation instance.
#[derive(Debug, Clone)]
pub struct Engine {
    state: SimState,
    finished: bool,
    last_outcome: Outcome,
}

fn initial_state(config: EngineConfig, seed: u64) -> SimState {
    let mut rng = Pcg32::for_world(seed);
    let world = generate_world(&mut rng);
    let market = generate_market(&mut rng);
    let ship = Ship::default();
    let stats = EpisodeStats {
        fuel_start: ship.fuel,
        hull_start: ship.hull,
        tool_start: ship.tool,
        ..EpisodeStats::default()
    };
    SimState {
        config,
        seed,
        rng,
        world,
        market,
        ship,
        stats,
        ticks_elapsed: 0,
        time_remaining: config.time_max,
    }
}

impl Engine {
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        let state = initial_state(config.sanitized(), seed);
        debug!(seed, nodes = state.world.node_count, "world generated");
        Self {
            state,
            finished: false,
            last_outcome: Outcome::default(),
        }
    }

    /// Regenerates everything from `seed`, keeping the configuration.
    pub fn reset(&mut self, seed: u64) -> Observation {
        self.state = initial_state(self.state.config, seed);
        self.finished = false;
        self.last_outcome = Outcome::default();
        debug!(seed, nodes = self.state.world.node_count, "world generated");
        encode(&self.state)
    }

    pub fn step(&mut self, code: u8) -> StepResult {
        if self.finished {
            return self.finished_response();
        }

        let before = Snapshot::capture(&self.state);
        let (action, coerced) = match Action::decode(code) {
            Some(action) => (action, false),
            None => (Action::Hold, true),
        };

        let Dispatch {
            mut dt,
            invalid,
            end_episode,
        } = dispatch(&mut self.state, action);
        let invalid = invalid || coerced;
        if invalid {
            dt = 1;
            apply_hold(&mut self.state);
        }

        apply_global_dynamics(&mut self.state, dt);
        self.state.ticks_elapsed += u32::from(dt);

        let destroyed = self.state.ship.hull <= 0.0;
        let stranded = self.state.ship.fuel <= 0.0 && !self.state.at_station();
        let terminated = end_episode || destroyed || stranded;
        let truncated = !terminated && self.state.time_remaining <= 0.0;
        let outcome = Outcome {
            destroyed,
            stranded,
            done: terminated || truncated,
        };

        let reward_terms =
            RewardTerms::compute(&self.state, &before, action.is_scan(), invalid, dt, outcome);
        let result = StepResult {
            obs: encode(&self.state),
            reward: reward_terms.total(),
            terminated,
            truncated,
            invalid_action: invalid,
            dt,
            resolved_action: i16::from(action.code()),
            metrics: StepMetrics::compute(&self.state, outcome),
            reward_terms,
            time_remaining: self.state.time_remaining,
            node_context: self.node_context(),
        };

        self.last_outcome = outcome;
        if outcome.done {
            self.finished = true;
            debug!(
                seed = self.state.seed,
                ticks = self.state.ticks_elapsed,
                destroyed,
                stranded,
                truncated,
                credits = self.state.ship.credits,
                "episode ended"
            );
        }
        result
    }

    /// Reply to a step on an ended episode; touches no state.
    fn finished_response(&self) -> StepResult {
        StepResult {
            obs: encode(&self.state),
            reward: 0.0,
            terminated: true,
            truncated: false,
            invalid_action: true,
            dt: 0,
            resolved_action: -1,
            metrics: StepMetrics::compute(&self.state, self.last_outcome),
            reward_terms: RewardTerms::default(),
            time_remaining: self.state.time_remaining,
            node_context: self.node_context(),
        }
    }

    fn node_context(&self) -> NodeContext {
        if self.state.at_station() {
            NodeContext::Station
        } else {
            NodeContext::Field
        }
    }

    pub fn observation(&self) -> Observation {
        encode(&self.state)
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Direct state access for scenario setup; bypasses every action rule.
    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    pub fn seed(&self) -> u64 {
        self.state.seed
    }

    pub fn config(&self) -> EngineConfig {
        self.state.config
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
