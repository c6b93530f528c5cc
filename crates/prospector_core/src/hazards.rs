//! Environmental damage and the pirate encounter model.

use crate::constants::{
    ALERT_MAX, CREDIT_SCALE, HAZARD_ALERT_PER_TICK, HAZARD_DAMAGE_PER_TICK,
    HAZARD_HEAT_PER_TICK, PIRATE_ALERT_SPIKE, PIRATE_ALERT_W, PIRATE_BIAS, PIRATE_CARGO_W,
    PIRATE_DECOY_LOSS_FACTOR, PIRATE_DECOY_TRIGGER, PIRATE_ESCAPE_W, PIRATE_INTENSITY_W,
};
use crate::mining::sigmoid;
use crate::SimState;

/// Where the ship is exposed to pirates this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exposure {
    /// Loitering at the current node; intensity is the node's pirate level.
    Node,
    /// In transit along an edge with the given true threat.
    Edge { threat: f32 },
}

/// Per-tick encounter probability compounded over `dt` ticks.
pub fn encounter_probability(state: &SimState, intensity: f32, dt: u16) -> f32 {
    let cargo_value = state.cargo_value();
    let escape = if state.ship.escape_buff > 0 { 1.0 } else { 0.0 };
    let logit = PIRATE_BIAS
        + PIRATE_INTENSITY_W * intensity
        + PIRATE_ALERT_W * (state.ship.alert / ALERT_MAX).clamp(0.0, 1.0)
        + PIRATE_CARGO_W * (cargo_value / CREDIT_SCALE).ln_1p()
        - PIRATE_ESCAPE_W * escape;
    let per_tick = sigmoid(logit);
    1.0 - (1.0 - per_tick).powf(f32::from(dt.max(1)))
}

/// Rolls for a pirate encounter. Never fires at the station.
///
/// Always draws the encounter roll; on a hit draws the loss fraction, a decoy
/// roll only if a decoy is held, then the hull damage.
pub fn maybe_pirate_encounter(state: &mut SimState, dt: u16, exposure: Exposure) {
    if state.at_station() {
        return;
    }
    let intensity = match exposure {
        Exposure::Node => state.current_node().pirate,
        Exposure::Edge { threat } => threat,
    };
    let value_before = state.cargo_value();
    let probability = encounter_probability(state, intensity, dt);
    if state.rng.next_f32() >= probability {
        return;
    }

    state.stats.pirate_encounters += 1;
    let mut loss = state.rng.uniform(0.08, 0.20);
    if state.ship.decoys > 0 && state.rng.next_f32() < PIRATE_DECOY_TRIGGER {
        state.ship.decoys -= 1;
        loss *= PIRATE_DECOY_LOSS_FACTOR;
    }
    for held in &mut state.ship.cargo {
        *held *= 1.0 - loss;
    }
    let value_after = state.cargo_value();
    if value_before > value_after {
        state.stats.value_lost_to_pirates += value_before - value_after;
    }
    state.ship.hull -= state.rng.uniform(1.0, 4.0);
    state.ship.alert += PIRATE_ALERT_SPIKE;
}

/// Damage, heat and alert from crossing an edge, then the transit pirate roll.
pub fn apply_edge_exposure(state: &mut SimState, dt: u16, threat: f32) {
    if dt == 0 {
        return;
    }
    let ticks = f32::from(dt);
    let mut damage = ticks * threat * HAZARD_DAMAGE_PER_TICK;
    damage *= state.rng.uniform(0.85, 1.15);
    state.ship.hull -= damage;
    state.ship.heat += ticks * threat * HAZARD_HEAT_PER_TICK;
    state.ship.alert += ticks * threat * HAZARD_ALERT_PER_TICK;
    maybe_pirate_encounter(state, dt, Exposure::Edge { threat });
}

/// Ambient hazard at the current node. Draws only when the hazard is positive.
pub fn apply_node_hazard(state: &mut SimState, dt: u16) {
    let hazard = state.current_node().hazard;
    if hazard <= 0.0 {
        return;
    }
    let ticks = f32::from(dt);
    let damage = ticks * hazard * HAZARD_DAMAGE_PER_TICK * state.rng.uniform(0.8, 1.2);
    state.ship.hull -= damage;
    state.ship.heat += ticks * hazard * HAZARD_HEAT_PER_TICK;
    state.ship.alert += ticks * hazard * HAZARD_ALERT_PER_TICK;
}
