//! Extraction, fracture risk, stabilizers and on-board refining.

use crate::actions::MiningMode;
use crate::constants::{
    CARGO_MAX, DEPLETION_PER_UNIT, FRACTURE_BASE_LOGIT, FRACTURE_HAZARD_INCREASE,
    FRACTURE_HEAT_W, FRACTURE_HULL_DAMAGE, FRACTURE_INSTABILITY_W, FRACTURE_STABILIZED_RELIEF,
    FRACTURE_TOOL_W, HEAT_EFFICIENCY_FLOOR, HEAT_EFFICIENCY_SPAN, HEAT_EFFICIENT_FRACTION,
    HEAT_MAX, N_COMMODITIES, REFINE_INPUT_FRACTION, REFINE_OUTPUT_COMMODITY, REFINE_YIELD,
    STABILIZE_BUFF_TICKS, TOOL_MAX,
};
use crate::SimState;

pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Heat efficiency: 1.0 up to 70% of the cap, then a linear drop to a floor.
pub fn heat_efficiency(heat_frac: f32) -> f32 {
    if heat_frac <= HEAT_EFFICIENT_FRACTION {
        1.0
    } else {
        HEAT_EFFICIENCY_FLOOR.max(1.0 - (heat_frac - HEAT_EFFICIENT_FRACTION) / HEAT_EFFICIENCY_SPAN)
    }
}

pub fn tool_efficiency(tool_frac: f32) -> f32 {
    0.4 + 0.6 * tool_frac
}

/// Mines the asteroid in `slot` at the current node. Caller has validated the selection.
///
/// Draws one lognormal noise factor, one fracture roll, and a severity on fracture.
pub fn mine(state: &mut SimState, slot: usize, mode: MiningMode) {
    let profile = mode.profile();
    let node = state.ship.node;
    let Some(asteroid) = state.world.nodes[node].asteroids[slot] else {
        return;
    };

    let base = asteroid.richness * (1.0 - asteroid.depletion).max(0.0);
    let tool_frac = (state.ship.tool / TOOL_MAX).clamp(0.0, 1.0);
    let heat_frac = (state.ship.heat / HEAT_MAX).clamp(0.0, 2.0);
    let eff_tool = tool_efficiency(tool_frac);
    let eff_heat = heat_efficiency(heat_frac);
    let noise = state.rng.normal(0.0, profile.noise_sigma).exp();

    let mut extracted = [0.0_f32; N_COMMODITIES];
    let mut total = 0.0_f32;
    for (amount, share) in extracted.iter_mut().zip(&asteroid.composition) {
        *amount = base * eff_tool * eff_heat * profile.yield_mult * noise * share;
        total += *amount;
    }

    let available = (CARGO_MAX - state.ship.cargo_total()).max(0.0);
    if total > available && total > 0.0 {
        let scale = available / total;
        total = available;
        for amount in &mut extracted {
            *amount *= scale;
        }
    }

    for (held, amount) in state.ship.cargo.iter_mut().zip(extracted) {
        *held += amount;
    }
    state.ship.heat += profile.heat_gain;
    state.ship.tool -= profile.wear;
    state.ship.alert += profile.alert_gain;
    state.stats.mining_ticks += 1;

    // Fracture risk uses the pre-extraction heat and tool fractions.
    let relief = if state.ship.stabilize_buff[slot] > 0 {
        FRACTURE_STABILIZED_RELIEF
    } else {
        0.0
    };
    let logit = FRACTURE_BASE_LOGIT
        + profile.fracture_bias
        + FRACTURE_INSTABILITY_W * (1.0 - asteroid.stability)
        + FRACTURE_HEAT_W * (heat_frac - HEAT_EFFICIENT_FRACTION).max(0.0)
        + FRACTURE_TOOL_W * (1.0 - tool_frac)
        - relief;

    let node_state = &mut state.world.nodes[node];
    let Some(target) = node_state.asteroids[slot].as_mut() else {
        return;
    };
    target.depletion = (target.depletion + DEPLETION_PER_UNIT * total).clamp(0.0, 1.0);

    if state.rng.next_f32() < sigmoid(logit) {
        let severity = state.rng.uniform(0.5, 1.0);
        state.ship.hull -= FRACTURE_HULL_DAMAGE * severity;
        target.depletion = 1.0;
        node_state.hazard = (node_state.hazard + FRACTURE_HAZARD_INCREASE).clamp(0.0, 1.0);
    }
}

/// Arms the stabilize buff on `slot`, consuming one stabilizer.
pub fn deploy_stabilizer(state: &mut SimState, slot: usize) {
    state.ship.stabilizers -= 1;
    state.ship.stabilize_buff[slot] = STABILIZE_BUFF_TICKS;
}

/// Converts a share of the two low-value commodities into the refined one.
pub fn refine_cargo(state: &mut SimState) {
    let cargo = &mut state.ship.cargo;
    let low_value = cargo[0] + cargo[1];
    if low_value <= 0.0 {
        return;
    }
    let input = REFINE_INPUT_FRACTION * low_value;
    let take = (input / low_value).min(1.0);
    cargo[0] *= 1.0 - take;
    cargo[1] *= 1.0 - take;
    cargo[REFINE_OUTPUT_COMMODITY] += REFINE_YIELD * input;
}
