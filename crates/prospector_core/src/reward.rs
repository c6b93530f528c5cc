//! Scalar reward from a pre-tick snapshot and the post-tick state.

use crate::constants::{
    CREDIT_SCALE, HEAT_MAX, REWARD_ALPHA_EXTRACT, REWARD_BETA_FUEL, REWARD_DELTA_WEAR,
    REWARD_DESTROYED_PENALTY, REWARD_EPSILON_HEAT, REWARD_GAMMA_TIME, REWARD_HEAT_SAFE_FRACTION,
    REWARD_KAPPA_PIRATE, REWARD_SCAN_COST, REWARD_STRANDED_PENALTY, REWARD_TERMINAL_BONUS,
    REWARD_ZETA_DAMAGE,
};
use crate::SimState;
use serde::{Deserialize, Serialize};

/// Scalars captured before dispatch; every reward term is a delta against these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub credits: f32,
    pub fuel: f32,
    pub hull: f32,
    pub heat: f32,
    pub tool: f32,
    pub cargo_value: f32,
    pub value_lost_to_pirates: f32,
}

impl Snapshot {
    pub fn capture(state: &SimState) -> Self {
        Self {
            credits: state.ship.credits,
            fuel: state.ship.fuel,
            hull: state.ship.hull,
            heat: state.ship.heat,
            tool: state.ship.tool,
            cargo_value: state.cargo_value(),
            value_lost_to_pirates: state.stats.value_lost_to_pirates,
        }
    }
}

/// How the tick ended, as seen by the reward and the metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub destroyed: bool,
    pub stranded: bool,
    pub done: bool,
}

impl Outcome {
    pub fn survived(self) -> bool {
        !self.destroyed && !self.stranded
    }
}

/// Per-term breakdown. [`RewardTerms::total`] sums in a fixed order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardTerms {
    pub sell: f32,
    pub extract: f32,
    pub fuel: f32,
    pub time: f32,
    pub wear: f32,
    pub heat: f32,
    pub damage: f32,
    pub scan: f32,
    pub invalid: f32,
    pub pirate: f32,
    pub terminal: f32,
}

impl RewardTerms {
    pub fn compute(
        state: &SimState,
        before: &Snapshot,
        scan_action: bool,
        invalid: bool,
        dt: u16,
        outcome: Outcome,
    ) -> Self {
        let ship = &state.ship;
        let cargo_gain = (state.cargo_value() - before.cargo_value).max(0.0);
        let heat_excess = (ship.heat - REWARD_HEAT_SAFE_FRACTION * HEAT_MAX).max(0.0);
        let heat_term = heat_excess / HEAT_MAX;
        let pirate_loss =
            (state.stats.value_lost_to_pirates - before.value_lost_to_pirates).max(0.0);

        let mut terminal = 0.0_f32;
        if outcome.stranded {
            terminal -= REWARD_STRANDED_PENALTY;
        }
        if outcome.destroyed {
            terminal -= REWARD_DESTROYED_PENALTY;
        }
        if outcome.done && outcome.survived() {
            terminal += REWARD_TERMINAL_BONUS * (ship.credits / CREDIT_SCALE);
        }

        Self {
            sell: (ship.credits - before.credits) / CREDIT_SCALE,
            extract: REWARD_ALPHA_EXTRACT * (cargo_gain / CREDIT_SCALE),
            fuel: -REWARD_BETA_FUEL * (before.fuel - ship.fuel).max(0.0) / 100.0,
            time: -REWARD_GAMMA_TIME * f32::from(dt),
            wear: -REWARD_DELTA_WEAR * (before.tool - ship.tool).max(0.0) / 10.0,
            heat: -REWARD_EPSILON_HEAT * heat_term * heat_term,
            damage: -REWARD_ZETA_DAMAGE * (before.hull - ship.hull).max(0.0) / 10.0,
            scan: if scan_action { -REWARD_SCAN_COST } else { 0.0 },
            invalid: if invalid {
                -state.config.invalid_action_penalty
            } else {
                0.0
            },
            pirate: -REWARD_KAPPA_PIRATE * (pirate_loss / CREDIT_SCALE),
            terminal,
        }
    }

    pub fn total(&self) -> f32 {
        self.sell
            + self.extract
            + self.fuel
            + self.time
            + self.wear
            + self.heat
            + self.damage
            + self.scan
            + self.invalid
            + self.pirate
            + self.terminal
    }
}
