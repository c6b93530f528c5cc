//! Action sources that drive a [`prospector_core::Engine`].
//!
//! Every source yields raw wire codes (`u8`), including out-of-range ones, so
//! the engine's invalid-action handling is exercised exactly as a harness would.

use prospector_core::actions::{
    COOLDOWN, FOCUSED_SCAN, HOLD, HULL_PATCH, MINE_BASE, OVERHAUL, PURCHASE_BASE, SELECT_BASE,
    SELL_BASE, TOOL_MAINTENANCE, TRAVEL_BASE,
};
use prospector_core::constants::{
    CARGO_MAX, FUEL_MAX, FUEL_MEDIUM, HEAT_MAX, N_COMMODITIES, OVERHAUL_COST,
};
use prospector_core::{MiningMode, NodeKind, SimState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub trait ActionSource {
    fn next_action(&mut self, state: &SimState) -> u8;
}

/// Upper bound (exclusive) for random codes; deliberately past the action table.
pub const RANDOM_CODE_LIMIT: u8 = 80;

/// Station trading, mining modes, scans, an escape burn, and out-of-range codes.
pub const STATION_MIX: [u8; 16] = [43, 61, 67, 28, 29, 30, 10, 9, 7, 33, 200, 253, 255, 6, 42, 68];

/// Scan, listen, select, mine, travel and sell in one loop.
pub const FIELD_CYCLE: [u8; 14] = [8, 11, 12, 29, 33, 6, 0, 42, 45, 32, 35, 7, 6, 68];

/// Named action streams used by parity runs and benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    Random,
    StationMix,
    FieldCycle,
    Autopilot,
}

impl Suite {
    pub fn source(self, seed: u64) -> Box<dyn ActionSource + Send> {
        match self {
            Suite::Random => Box::new(RandomActions::new(seed)),
            Suite::StationMix => Box::new(PatternActions::new(&STATION_MIX)),
            Suite::FieldCycle => Box::new(PatternActions::new(&FIELD_CYCLE)),
            Suite::Autopilot => Box::new(AutopilotActions),
        }
    }
}

// ---------------------------------------------------------------------------
// Random and fixed-pattern sources
// ---------------------------------------------------------------------------

/// Uniform codes in `0..RANDOM_CODE_LIMIT`, independent of the engine's RNG.
pub struct RandomActions {
    rng: ChaCha8Rng,
}

impl RandomActions {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ActionSource for RandomActions {
    fn next_action(&mut self, _state: &SimState) -> u8 {
        self.rng.gen_range(0..RANDOM_CODE_LIMIT)
    }
}

/// Cycles through a fixed code list forever.
pub struct PatternActions {
    codes: Vec<u8>,
    cursor: usize,
}

impl PatternActions {
    /// An empty pattern degenerates to holding.
    pub fn new(codes: &[u8]) -> Self {
        let codes = if codes.is_empty() {
            vec![HOLD]
        } else {
            codes.to_vec()
        };
        Self { codes, cursor: 0 }
    }
}

impl ActionSource for PatternActions {
    fn next_action(&mut self, _state: &SimState) -> u8 {
        let code = self.codes[self.cursor];
        self.cursor = (self.cursor + 1) % self.codes.len();
        code
    }
}

// ---------------------------------------------------------------------------
// Autopilot
// ---------------------------------------------------------------------------

/// Rule-based prospector. Judges asteroids only by what the agent could know
/// (estimates, gauges, prices), never by hidden asteroid truth.
///
/// Routing is privileged: heading home reads each neighbour's hop count to the
/// station from the world graph, which the observation does not carry. Treat
/// it as an oracle baseline, not as an observation-only policy.
///
/// In the field, in priority order:
/// 1. Cool down when hot, patch hull or tool when worn and a kit is aboard.
/// 2. Head home when the hold is nearly full or fuel runs low.
/// 3. Select the most valuable-looking asteroid; move on if none remain.
/// 4. Focus-scan low-confidence targets, then mine.
///
/// At the station it sells everything, refuels, overhauls when damaged, and
/// departs along the calmest edge.
pub struct AutopilotActions;

const HOT_FRACTION: f32 = 0.7;
const WORN_LEVEL: f32 = 40.0;
const RETURN_CARGO_FRACTION: f32 = 0.9;
const RETURN_FUEL_FRACTION: f32 = 0.3;
const REFUEL_FRACTION: f32 = 0.6;
const SCAN_CONFIDENCE: f32 = 0.25;
const CAREFUL_STABILITY: f32 = 0.35;
const OVERHAUL_HULL: f32 = 60.0;

#[allow(clippy::cast_possible_truncation)] // slots and commodities are < 16
fn code(base: u8, offset: usize) -> u8 {
    base + offset as u8
}

/// Edge slot leading one hop closer to the station, if any. Reads the
/// neighbours' `steps_to_station`, which only the full state exposes.
fn homeward_slot(state: &SimState) -> Option<usize> {
    let node = state.current_node();
    node.edges
        .iter()
        .enumerate()
        .filter_map(|(slot, edge)| edge.map(|edge| (slot, edge)))
        .min_by_key(|(_, edge)| state.world.nodes[edge.to].steps_to_station)
        .map(|(slot, _)| slot)
}

/// Edge slot toward a mining field with the lowest estimated threat.
fn outbound_slot(state: &SimState) -> Option<usize> {
    let node = state.current_node();
    node.edges
        .iter()
        .enumerate()
        .filter_map(|(slot, edge)| edge.map(|edge| (slot, edge)))
        .filter(|(_, edge)| state.world.nodes[edge.to].kind != NodeKind::Station)
        .min_by(|(_, a), (_, b)| a.threat_estimate.total_cmp(&b.threat_estimate))
        .map(|(slot, _)| slot)
}

/// Best-looking untouched asteroid at the current node, by estimated value.
fn best_asteroid(state: &SimState) -> Option<usize> {
    let prices = &state.market.commodities;
    state
        .current_node()
        .asteroids
        .iter()
        .enumerate()
        .filter_map(|(slot, asteroid)| asteroid.map(|asteroid| (slot, asteroid)))
        .filter(|(_, asteroid)| !asteroid.is_depleted())
        .map(|(slot, asteroid)| {
            let mut value = 0.0_f32;
            for (share, entry) in asteroid.estimate.composition.iter().zip(prices) {
                value += share * entry.price;
            }
            (slot, value * (1.0 - asteroid.depletion))
        })
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(slot, _)| slot)
}

fn station_action(state: &SimState) -> u8 {
    let ship = &state.ship;
    if let Some(commodity) = (0..N_COMMODITIES).find(|&c| ship.cargo[c] > 0.0) {
        return code(SELL_BASE, commodity * 3 + 2);
    }
    if ship.fuel < REFUEL_FRACTION * FUEL_MAX && ship.credits >= FUEL_MEDIUM.1 {
        return PURCHASE_BASE + 1;
    }
    if ship.hull < OVERHAUL_HULL && ship.credits >= OVERHAUL_COST {
        return OVERHAUL;
    }
    outbound_slot(state).map_or(HOLD, |slot| code(TRAVEL_BASE, slot))
}

fn field_action(state: &SimState) -> u8 {
    let ship = &state.ship;
    if ship.heat >= HOT_FRACTION * HEAT_MAX {
        return COOLDOWN;
    }
    if ship.repair_kits > 0 && ship.hull < WORN_LEVEL {
        return HULL_PATCH;
    }
    if ship.repair_kits > 0 && ship.tool < WORN_LEVEL {
        return TOOL_MAINTENANCE;
    }

    let heading_home = ship.cargo_total() >= RETURN_CARGO_FRACTION * CARGO_MAX
        || ship.fuel < RETURN_FUEL_FRACTION * FUEL_MAX;
    if heading_home {
        return homeward_slot(state).map_or(HOLD, |slot| code(TRAVEL_BASE, slot));
    }

    let Some(slot) = state.valid_selection() else {
        return match best_asteroid(state) {
            Some(slot) => code(SELECT_BASE, slot),
            None => outbound_slot(state)
                .or_else(|| homeward_slot(state))
                .map_or(HOLD, |slot| code(TRAVEL_BASE, slot)),
        };
    };

    let Some(asteroid) = state.current_node().asteroids[slot] else {
        return HOLD;
    };
    if asteroid.estimate.confidence < SCAN_CONFIDENCE {
        return FOCUSED_SCAN;
    }
    let mode = if asteroid.estimate.stability < CAREFUL_STABILITY {
        MiningMode::Careful
    } else {
        MiningMode::Normal
    };
    MINE_BASE + mode as u8
}

impl ActionSource for AutopilotActions {
    fn next_action(&mut self, state: &SimState) -> u8 {
        if state.at_station() {
            station_action(state)
        } else {
            field_action(state)
        }
    }
}
