//! The closed action set and its wire encoding (codes 0..69).

use crate::constants::N_ACTIONS;
use serde::{Deserialize, Serialize};

pub const TRAVEL_BASE: u8 = 0;
pub const HOLD: u8 = 6;
pub const EMERGENCY_BURN: u8 = 7;
pub const WIDE_SCAN: u8 = 8;
pub const FOCUSED_SCAN: u8 = 9;
pub const DEEP_SCAN: u8 = 10;
pub const THREAT_LISTEN: u8 = 11;
pub const SELECT_BASE: u8 = 12;
pub const MINE_BASE: u8 = 28;
pub const STABILIZE: u8 = 31;
pub const REFINE: u8 = 32;
pub const COOLDOWN: u8 = 33;
pub const TOOL_MAINTENANCE: u8 = 34;
pub const HULL_PATCH: u8 = 35;
pub const JETTISON_BASE: u8 = 36;
pub const DOCK: u8 = 42;
pub const SELL_BASE: u8 = 43;
pub const PURCHASE_BASE: u8 = 61;
pub const OVERHAUL: u8 = 67;
pub const END_EPISODE: u8 = 68;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiningMode {
    Careful,
    Normal,
    Aggressive,
}

/// Per-mode mining parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningProfile {
    pub yield_mult: f32,
    pub heat_gain: f32,
    pub wear: f32,
    pub alert_gain: f32,
    pub noise_sigma: f32,
    pub fracture_bias: f32,
}

impl MiningMode {
    const ALL: [MiningMode; 3] = [MiningMode::Careful, MiningMode::Normal, MiningMode::Aggressive];

    pub fn profile(self) -> MiningProfile {
        match self {
            MiningMode::Careful => MiningProfile {
                yield_mult: 0.80,
                heat_gain: 2.0,
                wear: 0.8,
                alert_gain: 1.2,
                noise_sigma: 0.05,
                fracture_bias: -0.7,
            },
            MiningMode::Normal => MiningProfile {
                yield_mult: 1.15,
                heat_gain: 4.0,
                wear: 1.6,
                alert_gain: 2.2,
                noise_sigma: 0.10,
                fracture_bias: 0.0,
            },
            MiningMode::Aggressive => MiningProfile {
                yield_mult: 1.55,
                heat_gain: 7.0,
                wear: 2.8,
                alert_gain: 4.0,
                noise_sigma: 0.16,
                fracture_bias: 0.8,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellFraction {
    Quarter,
    Half,
    All,
}

impl SellFraction {
    const ALL: [SellFraction; 3] = [SellFraction::Quarter, SellFraction::Half, SellFraction::All];

    pub fn value(self) -> f32 {
        match self {
            SellFraction::Quarter => 0.25,
            SellFraction::Half => 0.50,
            SellFraction::All => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseItem {
    FuelSmall,
    FuelMedium,
    FuelLarge,
    RepairKit,
    Stabilizer,
    Decoy,
}

impl PurchaseItem {
    const ALL: [PurchaseItem; 6] = [
        PurchaseItem::FuelSmall,
        PurchaseItem::FuelMedium,
        PurchaseItem::FuelLarge,
        PurchaseItem::RepairKit,
        PurchaseItem::Stabilizer,
        PurchaseItem::Decoy,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Travel { slot: usize },
    Hold,
    EmergencyBurn,
    WideScan,
    FocusedScan,
    DeepScan,
    ThreatListen,
    Select { slot: usize },
    Mine { mode: MiningMode },
    Stabilize,
    Refine,
    Cooldown,
    ToolMaintenance,
    HullPatch,
    Jettison { commodity: usize },
    Dock,
    Sell { commodity: usize, fraction: SellFraction },
    Purchase { item: PurchaseItem },
    Overhaul,
    EndEpisode,
}

impl Action {
    /// Maps a wire code to its action; `None` for codes `>= 69`.
    pub fn decode(code: u8) -> Option<Action> {
        let action = match code {
            0..=5 => Action::Travel {
                slot: usize::from(code - TRAVEL_BASE),
            },
            HOLD => Action::Hold,
            EMERGENCY_BURN => Action::EmergencyBurn,
            WIDE_SCAN => Action::WideScan,
            FOCUSED_SCAN => Action::FocusedScan,
            DEEP_SCAN => Action::DeepScan,
            THREAT_LISTEN => Action::ThreatListen,
            12..=27 => Action::Select {
                slot: usize::from(code - SELECT_BASE),
            },
            28..=30 => Action::Mine {
                mode: MiningMode::ALL[usize::from(code - MINE_BASE)],
            },
            STABILIZE => Action::Stabilize,
            REFINE => Action::Refine,
            COOLDOWN => Action::Cooldown,
            TOOL_MAINTENANCE => Action::ToolMaintenance,
            HULL_PATCH => Action::HullPatch,
            36..=41 => Action::Jettison {
                commodity: usize::from(code - JETTISON_BASE),
            },
            DOCK => Action::Dock,
            43..=60 => {
                let offset = usize::from(code - SELL_BASE);
                Action::Sell {
                    commodity: offset / 3,
                    fraction: SellFraction::ALL[offset % 3],
                }
            }
            61..=66 => Action::Purchase {
                item: PurchaseItem::ALL[usize::from(code - PURCHASE_BASE)],
            },
            OVERHAUL => Action::Overhaul,
            END_EPISODE => Action::EndEpisode,
            _ => return None,
        };
        Some(action)
    }

    /// Inverse of [`Action::decode`].
    #[allow(clippy::cast_possible_truncation)] // slot/commodity indices are < 16
    pub fn code(self) -> u8 {
        match self {
            Action::Travel { slot } => TRAVEL_BASE + slot as u8,
            Action::Hold => HOLD,
            Action::EmergencyBurn => EMERGENCY_BURN,
            Action::WideScan => WIDE_SCAN,
            Action::FocusedScan => FOCUSED_SCAN,
            Action::DeepScan => DEEP_SCAN,
            Action::ThreatListen => THREAT_LISTEN,
            Action::Select { slot } => SELECT_BASE + slot as u8,
            Action::Mine { mode } => MINE_BASE + mode as u8,
            Action::Stabilize => STABILIZE,
            Action::Refine => REFINE,
            Action::Cooldown => COOLDOWN,
            Action::ToolMaintenance => TOOL_MAINTENANCE,
            Action::HullPatch => HULL_PATCH,
            Action::Jettison { commodity } => JETTISON_BASE + commodity as u8,
            Action::Dock => DOCK,
            Action::Sell {
                commodity,
                fraction,
            } => SELL_BASE + commodity as u8 * 3 + fraction as u8,
            Action::Purchase { item } => PURCHASE_BASE + item as u8,
            Action::Overhaul => OVERHAUL,
            Action::EndEpisode => END_EPISODE,
        }
    }

    /// Scan actions carry a reward surcharge even when rejected.
    pub fn is_scan(self) -> bool {
        matches!(
            self,
            Action::WideScan | Action::FocusedScan | Action::DeepScan
        )
    }

    pub fn is_station_only(self) -> bool {
        matches!(
            self,
            Action::Dock | Action::Sell { .. } | Action::Purchase { .. } | Action::Overhaul
        )
    }

    /// Every action in wire order.
    pub fn all() -> impl Iterator<Item = Action> {
        (0..N_ACTIONS).filter_map(Action::decode)
    }
}

