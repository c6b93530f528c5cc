//! Per-action state transitions. Global dynamics run afterwards in the engine.

use crate::actions::{Action, PurchaseItem, SellFraction};
use crate::constants::{
    CARGO_MAX, COOLDOWN_ALERT, COOLDOWN_AMOUNT, COOLDOWN_FUEL, COOLDOWN_TIME, DEEP_SCAN_ALERT,
    DEEP_SCAN_FUEL, DEEP_SCAN_TIME, DOCK_ALERT_DROP, DOCK_TIME, EMERGENCY_BURN_ALERT,
    EMERGENCY_BURN_FUEL, ESCAPE_BUFF_TICKS, FOCUSED_SCAN_ALERT, FOCUSED_SCAN_FUEL,
    FOCUSED_SCAN_TIME, HULL_MAX, HULL_PATCH_AMOUNT, JETTISON_ALERT_RELIEF, MAINTENANCE_TIME,
    OVERHAUL_TIME, PATCH_TIME, REFINE_ALERT, REFINE_FUEL, REFINE_HEAT, REFINE_TIME,
    STABILIZE_TIME, THREAT_LISTEN_TIME, TOOL_MAX, TOOL_REPAIR_AMOUNT, TRAVEL_MASS_FACTOR,
    WIDE_SCAN_ALERT, WIDE_SCAN_FUEL, WIDE_SCAN_TIME,
};
use crate::dynamics::apply_hold;
use crate::hazards::apply_edge_exposure;
use crate::market;
use crate::mining::{deploy_stabilizer, mine, refine_cargo};
use crate::scan::{listen_for_threats, update_estimate, wide_scan, ScanMode};
use crate::{Ship, SimState};

/// What an action handler reports back to the step loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub dt: u16,
    pub invalid: bool,
    pub end_episode: bool,
}

impl Dispatch {
    fn ok(dt: u16) -> Self {
        Self {
            dt,
            invalid: false,
            end_episode: false,
        }
    }

    fn rejected(dt: u16) -> Self {
        Self {
            dt,
            invalid: true,
            end_episode: false,
        }
    }

    fn checked(dt: u16, valid: bool) -> Self {
        if valid {
            Self::ok(dt)
        } else {
            Self::rejected(dt)
        }
    }
}

/// Applies `action` to `state`. A rejected action still keeps any side effects
/// its handler applied before the validity check.
pub fn dispatch(state: &mut SimState, action: Action) -> Dispatch {
    match action {
        Action::Travel { slot } => travel(state, slot),
        Action::Hold => {
            apply_hold(state);
            Dispatch::ok(1)
        }
        Action::EmergencyBurn => {
            let ship = &mut state.ship;
            ship.fuel -= EMERGENCY_BURN_FUEL;
            ship.alert += EMERGENCY_BURN_ALERT;
            ship.escape_buff = ship.escape_buff.max(ESCAPE_BUFF_TICKS);
            Dispatch::ok(1)
        }
        Action::WideScan => {
            state.ship.fuel -= WIDE_SCAN_FUEL;
            state.ship.alert += WIDE_SCAN_ALERT;
            wide_scan(state);
            state.stats.scan_count += 1;
            Dispatch::ok(WIDE_SCAN_TIME)
        }
        Action::FocusedScan => targeted_scan(
            state,
            ScanMode::Focused,
            FOCUSED_SCAN_TIME,
            FOCUSED_SCAN_FUEL,
            FOCUSED_SCAN_ALERT,
        ),
        Action::DeepScan => targeted_scan(
            state,
            ScanMode::Deep,
            DEEP_SCAN_TIME,
            DEEP_SCAN_FUEL,
            DEEP_SCAN_ALERT,
        ),
        Action::ThreatListen => {
            listen_for_threats(state);
            Dispatch::ok(THREAT_LISTEN_TIME)
        }
        Action::Select { slot } => select(state, slot),
        Action::Mine { mode } => match state.valid_selection() {
            Some(slot) => {
                mine(state, slot, mode);
                Dispatch::ok(1)
            }
            None => Dispatch::rejected(1),
        },
        Action::Stabilize => match state.valid_selection() {
            Some(slot) if state.ship.stabilizers > 0 => {
                deploy_stabilizer(state, slot);
                Dispatch::ok(STABILIZE_TIME)
            }
            _ => Dispatch::rejected(STABILIZE_TIME),
        },
        Action::Refine => {
            let ship = &mut state.ship;
            ship.fuel -= REFINE_FUEL;
            ship.heat += REFINE_HEAT;
            ship.alert += REFINE_ALERT;
            refine_cargo(state);
            Dispatch::ok(REFINE_TIME)
        }
        Action::Cooldown => {
            let ship = &mut state.ship;
            ship.fuel -= COOLDOWN_FUEL;
            ship.heat = (ship.heat - COOLDOWN_AMOUNT).max(0.0);
            ship.alert += COOLDOWN_ALERT;
            Dispatch::ok(COOLDOWN_TIME)
        }
        Action::ToolMaintenance => use_repair_kit(state, MAINTENANCE_TIME, |ship| {
            ship.tool = TOOL_MAX.min(ship.tool + TOOL_REPAIR_AMOUNT);
        }),
        Action::HullPatch => use_repair_kit(state, PATCH_TIME, |ship| {
            ship.hull = HULL_MAX.min(ship.hull + HULL_PATCH_AMOUNT);
        }),
        Action::Jettison { commodity } => {
            state.ship.cargo[commodity] = 0.0;
            state.ship.alert = (state.ship.alert - JETTISON_ALERT_RELIEF).max(0.0);
            Dispatch::ok(1)
        }
        Action::Dock => {
            if !state.at_station() {
                return Dispatch::rejected(DOCK_TIME);
            }
            state.ship.alert = (state.ship.alert - DOCK_ALERT_DROP).max(0.0);
            Dispatch::ok(DOCK_TIME)
        }
        Action::Sell {
            commodity,
            fraction,
        } => station_sell(state, commodity, fraction),
        Action::Purchase { item } => station_purchase(state, item),
        Action::Overhaul => {
            let done = state.at_station() && market::overhaul(state).is_ok();
            Dispatch::checked(OVERHAUL_TIME, done)
        }
        Action::EndEpisode => Dispatch {
            dt: 1,
            invalid: false,
            end_episode: true,
        },
    }
}

/// Spends one kit on `apply`; rejected without side effects when none are aboard.
fn use_repair_kit(state: &mut SimState, dt: u16, apply: impl FnOnce(&mut Ship)) -> Dispatch {
    let ship = &mut state.ship;
    if ship.repair_kits == 0 {
        return Dispatch::rejected(dt);
    }
    ship.repair_kits -= 1;
    apply(ship);
    Dispatch::ok(dt)
}

/// Moves along the edge in `slot`. Fuel scales with the cargo load.
fn travel(state: &mut SimState, slot: usize) -> Dispatch {
    let Some(edge) = state.current_node().edges[slot] else {
        return Dispatch::rejected(1);
    };
    let dt = u16::from(edge.travel_time.max(1));
    let mass_factor = 1.0 + TRAVEL_MASS_FACTOR * (state.ship.cargo_total() / CARGO_MAX);

    state.ship.fuel -= edge.fuel_cost * mass_factor;
    state.ship.node = edge.to;
    state.ship.selected = None;
    apply_edge_exposure(state, dt, edge.threat);
    Dispatch::ok(dt)
}

/// Focused and deep scans pay their fuel and alert even without a target.
fn targeted_scan(state: &mut SimState, mode: ScanMode, dt: u16, fuel: f32, alert: f32) -> Dispatch {
    state.ship.fuel -= fuel;
    state.ship.alert += alert;
    let Some(slot) = state.valid_selection() else {
        return Dispatch::rejected(dt);
    };
    let node = state.ship.node;
    if let Some(asteroid) = state.world.nodes[node].asteroids[slot].as_mut() {
        update_estimate(asteroid, mode, &mut state.rng);
    }
    state.stats.scan_count += 1;
    Dispatch::ok(dt)
}

/// A failed selection keeps whatever was selected before.
fn select(state: &mut SimState, slot: usize) -> Dispatch {
    let selectable = matches!(
        state.current_node().asteroids[slot],
        Some(asteroid) if !asteroid.is_depleted()
    );
    if selectable {
        state.ship.selected = Some(slot);
    }
    Dispatch::checked(1, selectable)
}

fn station_sell(state: &mut SimState, commodity: usize, fraction: SellFraction) -> Dispatch {
    if !state.at_station() {
        return Dispatch::rejected(1);
    }
    market::sell(state, commodity, fraction);
    Dispatch::ok(1)
}

fn station_purchase(state: &mut SimState, item: PurchaseItem) -> Dispatch {
    let done = state.at_station() && market::purchase(state, item).is_ok();
    Dispatch::checked(1, done)
}
