//! Engine-wide capacities and tuning constants.
//!
//! Capacities are part of the observation-layout contract. Tuning values feed
//! closed-form per-tick formulas; changing any of them changes trajectories.

use std::f32::consts::PI;

pub const N_COMMODITIES: usize = 6;
pub const MAX_NODES: usize = 32;
pub const MAX_NEIGHBORS: usize = 6;
pub const MAX_ASTEROIDS: usize = 16;
pub const NODE_KINDS: usize = 3;

pub const OBS_DIM: usize = 260;
pub const N_ACTIONS: u8 = 69;
pub const N_METRICS: usize = 13;

/// RNG stream id used for every world.
pub const RNG_STREAM: u64 = 54;

// --- Ship capacities --------------------------------------------------------

pub const CREDIT_SCALE: f32 = 1000.0;
pub const FUEL_MAX: f32 = 1000.0;
pub const HULL_MAX: f32 = 100.0;
pub const HEAT_MAX: f32 = 100.0;
pub const TOOL_MAX: f32 = 100.0;
pub const CARGO_MAX: f32 = 200.0;
pub const ALERT_MAX: f32 = 100.0;
pub const TIME_MAX: f32 = 20000.0;
pub const CREDITS_CAP: f32 = 10_000_000.0;

pub const REPAIR_KITS_CAP: u8 = 12;
pub const STABILIZERS_CAP: u8 = 12;
pub const DECOYS_CAP: u8 = 12;

pub const START_REPAIR_KITS: u8 = 3;
pub const START_STABILIZERS: u8 = 2;
pub const START_DECOYS: u8 = 1;

pub const DEFAULT_INVALID_ACTION_PENALTY: f32 = 0.01;

// --- World generation -------------------------------------------------------

pub const MIN_NODES: u32 = 8;
pub const HAZARD_NODE_PROBABILITY: f32 = 0.25;
pub const HAZARD_NODE_HAZARD_BOOST: f32 = 0.25;
pub const HAZARD_NODE_PIRATE_BOOST: f32 = 0.12;

pub const TRAVEL_TIME_MAX: f32 = 8.0;
pub const TRAVEL_FUEL_COST_MAX: f32 = 160.0;
pub const EDGE_FUEL_COST_MIN: f32 = 20.0;
pub const EDGE_THREAT_NOISE: f32 = 0.05;
pub const EDGE_THREAT_PRIOR: f32 = 0.5;

pub const MIN_ASTEROIDS: u32 = 5;
pub const ASTEROID_STABILITY_PRIOR: f32 = 0.5;
pub const ASTEROID_CONFIDENCE_PRIOR: f32 = 0.1;

pub const PRICE_BASE: [f32; N_COMMODITIES] = [45.0, 55.0, 85.0, 145.0, 210.0, 120.0];
pub const INV_PRICE_BASE: [f32; N_COMMODITIES] = [
    1.0 / 45.0,
    1.0 / 55.0,
    1.0 / 85.0,
    1.0 / 145.0,
    1.0 / 210.0,
    1.0 / 120.0,
];
pub const PRICE_MIN: [f32; N_COMMODITIES] = [12.0, 15.0, 20.0, 50.0, 80.0, 30.0];
pub const PRICE_MAX: [f32; N_COMMODITIES] = [180.0, 200.0, 240.0, 320.0, 420.0, 300.0];

pub const TWO_PI: f32 = 2.0 * PI;

// --- Action durations (ticks) ---------------------------------------------

pub const WIDE_SCAN_TIME: u16 = 3;
pub const FOCUSED_SCAN_TIME: u16 = 2;
pub const DEEP_SCAN_TIME: u16 = 4;
pub const THREAT_LISTEN_TIME: u16 = 2;
pub const STABILIZE_TIME: u16 = 2;
pub const REFINE_TIME: u16 = 2;
pub const COOLDOWN_TIME: u16 = 2;
pub const MAINTENANCE_TIME: u16 = 2;
pub const PATCH_TIME: u16 = 2;
pub const DOCK_TIME: u16 = 1;
pub const OVERHAUL_TIME: u16 = 3;

// --- Action costs -----------------------------------------------------------

pub const WIDE_SCAN_FUEL: f32 = 5.0;
pub const FOCUSED_SCAN_FUEL: f32 = 4.0;
pub const DEEP_SCAN_FUEL: f32 = 8.0;
pub const REFINE_FUEL: f32 = 4.0;
pub const COOLDOWN_FUEL: f32 = 2.0;
pub const EMERGENCY_BURN_FUEL: f32 = 18.0;

pub const REFINE_HEAT: f32 = 6.0;
pub const COOLDOWN_AMOUNT: f32 = 20.0;

pub const EMERGENCY_BURN_ALERT: f32 = 10.0;
pub const WIDE_SCAN_ALERT: f32 = 4.0;
pub const FOCUSED_SCAN_ALERT: f32 = 3.0;
pub const DEEP_SCAN_ALERT: f32 = 6.0;
pub const REFINE_ALERT: f32 = 3.0;
pub const COOLDOWN_ALERT: f32 = 1.0;
pub const HOLD_ALERT_DECAY: f32 = 3.0;
pub const DOCK_ALERT_DROP: f32 = 20.0;
pub const JETTISON_ALERT_RELIEF: f32 = 8.0;

pub const HEAT_DISSIPATION_PER_TICK: f32 = 2.5;
pub const OVERHEAT_DAMAGE_PER_UNIT: f32 = 1.25;

pub const TOOL_REPAIR_AMOUNT: f32 = 25.0;
pub const HULL_PATCH_AMOUNT: f32 = 20.0;

pub const ESCAPE_BUFF_TICKS: u8 = 4;
pub const STABILIZE_BUFF_TICKS: u8 = 6;

pub const TRAVEL_MASS_FACTOR: f32 = 0.5;

// --- Refining ---------------------------------------------------------------

pub const REFINE_INPUT_FRACTION: f32 = 0.15;
pub const REFINE_YIELD: f32 = 0.65;
/// Commodity receiving refined output.
pub const REFINE_OUTPUT_COMMODITY: usize = 4;

// --- Mining -----------------------------------------------------------------

pub const DEPLETION_PER_UNIT: f32 = 0.01;
pub const HEAT_EFFICIENT_FRACTION: f32 = 0.7;
pub const HEAT_EFFICIENCY_SPAN: f32 = 0.3;
pub const HEAT_EFFICIENCY_FLOOR: f32 = 0.1;
pub const FRACTURE_BASE_LOGIT: f32 = -3.1;
pub const FRACTURE_INSTABILITY_W: f32 = 2.5;
pub const FRACTURE_HEAT_W: f32 = 2.2;
pub const FRACTURE_TOOL_W: f32 = 1.5;
pub const FRACTURE_STABILIZED_RELIEF: f32 = 1.1;
pub const FRACTURE_HULL_DAMAGE: f32 = 12.0;
pub const FRACTURE_HAZARD_INCREASE: f32 = 0.1;

// --- Hazards and pirates ----------------------------------------------------

pub const HAZARD_DAMAGE_PER_TICK: f32 = 0.7;
pub const HAZARD_HEAT_PER_TICK: f32 = 0.5;
pub const HAZARD_ALERT_PER_TICK: f32 = 0.8;

pub const PIRATE_BIAS: f32 = -4.0;
pub const PIRATE_INTENSITY_W: f32 = 3.0;
pub const PIRATE_ALERT_W: f32 = 2.2;
pub const PIRATE_CARGO_W: f32 = 0.8;
pub const PIRATE_ESCAPE_W: f32 = 2.8;
pub const PIRATE_DECOY_TRIGGER: f32 = 0.6;
pub const PIRATE_DECOY_LOSS_FACTOR: f32 = 0.3;
pub const PIRATE_ALERT_SPIKE: f32 = 8.0;

// --- Market -----------------------------------------------------------------

pub const SLIPPAGE_K: f32 = 0.25;
pub const SLIPPAGE_ROOT: f32 = 0.2;
pub const SLIPPAGE_CAP: f32 = 0.70;

pub const INVENTORY_PRESSURE_K: f32 = 0.04;
pub const SALES_PRESSURE_K: f32 = 0.05;
pub const MARKET_NOISE_K: f32 = 0.03;
pub const SALES_DECAY_TAU: f32 = 14.0;
pub const INVENTORY_DECAY: f32 = 0.998;

pub const FUEL_SMALL: (f32, f32) = (120.0, 60.0);
pub const FUEL_MEDIUM: (f32, f32) = (260.0, 120.0);
pub const FUEL_LARGE: (f32, f32) = (480.0, 210.0);
pub const REPAIR_KIT_COST: f32 = 150.0;
pub const STABILIZER_COST: f32 = 175.0;
pub const DECOY_COST: f32 = 110.0;
pub const OVERHAUL_COST: f32 = 280.0;

// --- Reward -----------------------------------------------------------------

pub const REWARD_ALPHA_EXTRACT: f32 = 0.02;
pub const REWARD_BETA_FUEL: f32 = 0.10;
pub const REWARD_GAMMA_TIME: f32 = 0.001;
pub const REWARD_DELTA_WEAR: f32 = 0.05;
pub const REWARD_EPSILON_HEAT: f32 = 0.20;
pub const REWARD_ZETA_DAMAGE: f32 = 1.00;
pub const REWARD_KAPPA_PIRATE: f32 = 1.00;
pub const REWARD_SCAN_COST: f32 = 0.005;
pub const REWARD_HEAT_SAFE_FRACTION: f32 = 0.70;
pub const REWARD_STRANDED_PENALTY: f32 = 50.0;
pub const REWARD_DESTROYED_PENALTY: f32 = 100.0;
pub const REWARD_TERMINAL_BONUS: f32 = 0.002;

// --- Observation normalizers ------------------------------------------------

pub const INV_TRAVEL_TIME_MAX: f32 = 1.0 / TRAVEL_TIME_MAX;
pub const INV_TRAVEL_FUEL_COST_MAX: f32 = 1.0 / TRAVEL_FUEL_COST_MAX;
pub const PRICE_SCALE: f32 = 100.0;
pub const INV_PRICE_SCALE: f32 = 1.0 / PRICE_SCALE;
pub const STATION_INVENTORY_NORM_CAP: f32 = 500.0;
pub const INV_STATION_INVENTORY_NORM_CAP: f32 = 1.0 / STATION_INVENTORY_NORM_CAP;
pub const INV_MAX_NODE_INDEX: f32 = 1.0 / (MAX_NODES - 1) as f32;
