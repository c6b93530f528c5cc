//! Per-step info metrics, reported in a fixed 13-slot order.

use crate::constants::N_METRICS;
use crate::reward::Outcome;
use crate::SimState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepMetrics {
    pub credits: f32,
    pub net_profit: f32,
    pub profit_per_tick: f32,
    pub survival: f32,
    pub overheat_ticks: f32,
    pub pirate_encounters: f32,
    pub value_lost_to_pirates: f32,
    pub fuel_used: f32,
    pub hull_damage: f32,
    pub tool_wear: f32,
    pub scan_count: f32,
    pub mining_ticks: f32,
    pub cargo_utilization_avg: f32,
}

impl StepMetrics {
    /// Column names in wire order.
    pub const NAMES: [&'static str; N_METRICS] = [
        "credits",
        "net_profit",
        "profit_per_tick",
        "survival",
        "overheat_ticks",
        "pirate_encounters",
        "value_lost_to_pirates",
        "fuel_used",
        "hull_damage",
        "tool_wear",
        "scan_count",
        "mining_ticks",
        "cargo_utilization_avg",
    ];

    pub fn compute(state: &SimState, outcome: Outcome) -> Self {
        let stats = &state.stats;
        let ship = &state.ship;
        let net_profit = ship.credits - stats.total_spend;
        let ticks = state.ticks_elapsed.max(1) as f32;
        let utilization = if stats.cargo_util_count > 0.0 {
            stats.cargo_util_sum / stats.cargo_util_count
        } else {
            0.0
        };

        Self {
            credits: ship.credits,
            net_profit,
            profit_per_tick: net_profit / ticks,
            survival: if outcome.survived() { 1.0 } else { 0.0 },
            overheat_ticks: stats.overheat_ticks as f32,
            pirate_encounters: stats.pirate_encounters as f32,
            value_lost_to_pirates: stats.value_lost_to_pirates,
            fuel_used: (stats.fuel_start - ship.fuel).max(0.0),
            hull_damage: (stats.hull_start - ship.hull).max(0.0),
            tool_wear: (stats.tool_start - ship.tool).max(0.0),
            scan_count: stats.scan_count as f32,
            mining_ticks: stats.mining_ticks as f32,
            cargo_utilization_avg: utilization.clamp(0.0, 1.0),
        }
    }

    pub fn to_array(&self) -> [f32; N_METRICS] {
        [
            self.credits,
            self.net_profit,
            self.profit_per_tick,
            self.survival,
            self.overheat_ticks,
            self.pirate_encounters,
            self.value_lost_to_pirates,
            self.fuel_used,
            self.hull_damage,
            self.tool_wear,
            self.scan_count,
            self.mining_ticks,
            self.cargo_utilization_avg,
        ]
    }

    pub fn from_array(values: [f32; N_METRICS]) -> Self {
        let [
            credits,
            net_profit,
            profit_per_tick,
            survival,
            overheat_ticks,
            pirate_encounters,
            value_lost_to_pirates,
            fuel_used,
            hull_damage,
            tool_wear,
            scan_count,
            mining_ticks,
            cargo_utilization_avg,
        ] = values;
        Self {
            credits,
            net_profit,
            profit_per_tick,
            survival,
            overheat_ticks,
            pirate_encounters,
            value_lost_to_pirates,
            fuel_used,
            hull_damage,
            tool_wear,
            scan_count,
            mining_ticks,
            cargo_utilization_avg,
        }
    }
}
