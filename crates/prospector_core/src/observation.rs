//! Fixed-layout observation encoder.
//!
//! Field positions are a wire contract for external consumers:
//!
//! | Range     | Contents                                              |
//! |-----------|-------------------------------------------------------|
//! | 0..8      | fuel, hull, heat, tool, cargo fill, alert, time, credits |
//! | 8..14     | cargo per commodity                                   |
//! | 14..17    | repair kits, stabilizers, decoys                      |
//! | 17, 18    | docked, valid selection                               |
//! | 19..22    | current node kind one-hot                             |
//! | 22, 23    | node index, hops to station                           |
//! | 24..66    | 6 neighbor blocks × 7                                 |
//! | 66..68    | unused, always 0                                      |
//! | 68..244   | 16 asteroid blocks × 11                               |
//! | 244..250  | price / base price                                    |
//! | 250..256  | price delta / 100                                     |
//! | 256..260  | station inventory of commodities 0, 2, 3, 4           |

use crate::constants::{
    ALERT_MAX, CARGO_MAX, CREDITS_CAP, DECOYS_CAP, FUEL_MAX, HEAT_MAX, HULL_MAX,
    INV_MAX_NODE_INDEX, INV_PRICE_BASE, INV_PRICE_SCALE, INV_STATION_INVENTORY_NORM_CAP,
    INV_TRAVEL_FUEL_COST_MAX, INV_TRAVEL_TIME_MAX, N_COMMODITIES, OBS_DIM, PRICE_BASE,
    REPAIR_KITS_CAP, STABILIZERS_CAP, TOOL_MAX,
};
use crate::graph::UNREACHABLE;
use crate::SimState;

pub type Observation = [f32; OBS_DIM];

pub const VITALS: usize = 0;
pub const CARGO: usize = 8;
pub const CONSUMABLES: usize = 14;
pub const DOCKED: usize = 17;
pub const HAS_SELECTION: usize = 18;
pub const NODE_KIND: usize = 19;
pub const NODE_INDEX: usize = 22;
pub const STEPS_TO_STATION: usize = 23;
pub const NEIGHBOR_BASE: usize = 24;
pub const NEIGHBOR_STRIDE: usize = 7;
pub const ASTEROID_BASE: usize = 68;
pub const ASTEROID_STRIDE: usize = 11;
pub const PRICE: usize = 244;
pub const PRICE_DELTA: usize = 250;
pub const INVENTORY: usize = 256;
/// Commodities whose station inventory is exposed, in slot order.
pub const INVENTORY_COMMODITIES: [usize; 4] = [0, 2, 3, 4];

const PROB_FLOOR: f32 = 1.0e-8;

fn unit(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Observation-side renormalization: floor at 1e-8, multiply by the reciprocal sum.
fn normalize_for_obs(values: &[f32; N_COMMODITIES], out: &mut [f32]) {
    let mut sum = 0.0_f32;
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value.max(PROB_FLOOR);
        sum += *slot;
    }
    if sum <= 0.0 {
        out.fill(1.0 / N_COMMODITIES as f32);
        return;
    }
    let inv_sum = 1.0 / sum;
    for slot in out.iter_mut() {
        *slot *= inv_sum;
    }
}

pub fn encode(state: &SimState) -> Observation {
    let mut obs = [0.0_f32; OBS_DIM];
    let ship = &state.ship;
    let node = state.current_node();

    let credits_norm = ship.credits.max(0.0).ln_1p() / CREDITS_CAP.ln_1p();
    let vitals = [
        ship.fuel / FUEL_MAX,
        ship.hull / HULL_MAX,
        ship.heat / HEAT_MAX,
        ship.tool / TOOL_MAX,
        ship.cargo_total() / CARGO_MAX,
        ship.alert / ALERT_MAX,
        state.time_remaining / state.config.time_max,
        credits_norm,
    ];
    for (slot, value) in obs[VITALS..CARGO].iter_mut().zip(vitals) {
        *slot = unit(value);
    }
    for (slot, held) in obs[CARGO..CONSUMABLES].iter_mut().zip(&ship.cargo) {
        *slot = unit(held / CARGO_MAX);
    }
    obs[CONSUMABLES] = unit(f32::from(ship.repair_kits) / f32::from(REPAIR_KITS_CAP));
    obs[CONSUMABLES + 1] = unit(f32::from(ship.stabilizers) / f32::from(STABILIZERS_CAP));
    obs[CONSUMABLES + 2] = unit(f32::from(ship.decoys) / f32::from(DECOYS_CAP));

    obs[DOCKED] = if state.at_station() { 1.0 } else { 0.0 };
    obs[HAS_SELECTION] = if state.valid_selection().is_some() {
        1.0
    } else {
        0.0
    };
    obs[NODE_KIND + node.kind.index()] = 1.0;

    let steps = if ship.node < state.world.node_count {
        node.steps_to_station
    } else {
        UNREACHABLE
    };
    obs[NODE_INDEX] = unit(ship.node as f32 * INV_MAX_NODE_INDEX);
    obs[STEPS_TO_STATION] = unit(f32::from(steps) * INV_MAX_NODE_INDEX);

    for (slot, edge) in node.edges.iter().enumerate() {
        let Some(edge) = edge else {
            continue;
        };
        let base = NEIGHBOR_BASE + NEIGHBOR_STRIDE * slot;
        obs[base] = 1.0;
        obs[base + 1 + state.world.nodes[edge.to].kind.index()] = 1.0;
        obs[base + 4] = unit(f32::from(edge.travel_time) * INV_TRAVEL_TIME_MAX);
        obs[base + 5] = unit(edge.fuel_cost * INV_TRAVEL_FUEL_COST_MAX);
        obs[base + 6] = unit(edge.threat_estimate);
    }

    for (slot, asteroid) in node.asteroids.iter().enumerate() {
        let Some(asteroid) = asteroid else {
            continue;
        };
        let base = ASTEROID_BASE + ASTEROID_STRIDE * slot;
        obs[base] = 1.0;
        normalize_for_obs(&asteroid.estimate.composition, &mut obs[base + 1..base + 7]);
        obs[base + 7] = unit(asteroid.estimate.stability);
        obs[base + 8] = unit(asteroid.depletion);
        obs[base + 9] = unit(asteroid.estimate.confidence);
        // Marks the selected slot even when the selection is no longer valid.
        obs[base + 10] = if ship.selected == Some(slot) { 1.0 } else { 0.0 };
    }

    for (index, entry) in state.market.commodities.iter().enumerate() {
        let ratio = if PRICE_BASE[index] > 0.0 {
            entry.price * INV_PRICE_BASE[index]
        } else {
            0.0
        };
        obs[PRICE + index] = unit(ratio);
        obs[PRICE_DELTA + index] =
            ((entry.price - entry.prev_price) * INV_PRICE_SCALE).clamp(-1.0, 1.0);
    }
    for (offset, commodity) in INVENTORY_COMMODITIES.iter().enumerate() {
        let inventory = state.market.commodities[*commodity].inventory;
        obs[INVENTORY + offset] = unit(inventory * INV_STATION_INVENTORY_NORM_CAP);
    }

    obs
}
