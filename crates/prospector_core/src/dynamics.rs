//! Shared per-tick resolution, run once after every dispatched action.

use crate::constants::{
    ALERT_MAX, CARGO_MAX, FUEL_MAX, HEAT_DISSIPATION_PER_TICK, HEAT_MAX, HOLD_ALERT_DECAY,
    HULL_MAX, OVERHEAT_DAMAGE_PER_UNIT, TOOL_MAX,
};
use crate::hazards::{apply_node_hazard, maybe_pirate_encounter, Exposure};
use crate::market::update_market;
use crate::SimState;

pub fn dissipate_heat(state: &mut SimState, dt: u16) {
    state.ship.heat = (state.ship.heat - HEAT_DISSIPATION_PER_TICK * f32::from(dt)).max(0.0);
}

/// Passive alert decay plus one tick of heat dissipation.
pub fn apply_hold(state: &mut SimState) {
    state.ship.alert = (state.ship.alert - HOLD_ALERT_DECAY).max(0.0);
    dissipate_heat(state, 1);
}

fn tick_buffs(state: &mut SimState, dt: u16) {
    let step = |ticks: &mut u8| {
        *ticks = u8::try_from(u16::from(*ticks).saturating_sub(dt)).unwrap_or(0);
    };
    step(&mut state.ship.escape_buff);
    for ticks in &mut state.ship.stabilize_buff {
        step(ticks);
    }
}

/// Clamps every bounded scalar and rescales cargo that exceeds the hold.
pub fn clamp_state(state: &mut SimState) {
    let ship = &mut state.ship;
    ship.fuel = ship.fuel.clamp(0.0, FUEL_MAX);
    ship.hull = ship.hull.clamp(0.0, HULL_MAX);
    ship.heat = ship.heat.clamp(0.0, HEAT_MAX);
    ship.tool = ship.tool.clamp(0.0, TOOL_MAX);
    ship.alert = ship.alert.clamp(0.0, ALERT_MAX);
    state.time_remaining = state.time_remaining.clamp(0.0, state.config.time_max);

    let mut total = 0.0_f32;
    for held in &mut ship.cargo {
        *held = held.clamp(0.0, CARGO_MAX);
        total += *held;
    }
    if total > CARGO_MAX && total > 0.0 {
        let scale = CARGO_MAX / total;
        for held in &mut ship.cargo {
            *held *= scale;
        }
    }
}

fn track_cargo_utilization(state: &mut SimState, dt: u16) {
    let fill = (state.ship.cargo_total() / CARGO_MAX).clamp(0.0, 1.0);
    state.stats.cargo_util_sum += fill * f32::from(dt);
    state.stats.cargo_util_count += f32::from(dt);
}

/// Time, heat, buffs, overheat, field exposure, market, clamping, utilization.
pub fn apply_global_dynamics(state: &mut SimState, dt: u16) {
    state.time_remaining -= f32::from(dt);
    dissipate_heat(state, dt);
    tick_buffs(state, dt);

    if state.ship.heat > HEAT_MAX {
        let overflow = state.ship.heat - HEAT_MAX;
        state.ship.hull -= OVERHEAT_DAMAGE_PER_UNIT * overflow;
        state.ship.heat = HEAT_MAX;
        state.stats.overheat_ticks += u32::from(dt);
    }

    if !state.at_station() {
        apply_node_hazard(state, dt);
        maybe_pirate_encounter(state, dt, Exposure::Node);
    }

    update_market(state, dt);
    clamp_state(state);
    track_cargo_utilization(state, dt);
}
