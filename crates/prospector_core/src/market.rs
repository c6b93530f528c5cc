//! Station trading and the per-tick price process.

use crate::actions::{PurchaseItem, SellFraction};
use crate::constants::{
    DECOYS_CAP, DECOY_COST, FUEL_LARGE, FUEL_MAX, FUEL_MEDIUM, FUEL_SMALL, HULL_MAX,
    INVENTORY_DECAY, INVENTORY_PRESSURE_K, MARKET_NOISE_K, OVERHAUL_COST, PRICE_BASE, PRICE_MAX,
    PRICE_MIN, REPAIR_KITS_CAP, REPAIR_KIT_COST, SALES_DECAY_TAU, SALES_PRESSURE_K,
    SLIPPAGE_CAP, SLIPPAGE_K, SLIPPAGE_ROOT, STABILIZERS_CAP, STABILIZER_COST, TOOL_MAX, TWO_PI,
};
use crate::SimState;

/// Why a station transaction was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeRejection {
    InsufficientCredits,
    AtCapacity,
}

/// Market-impact discount for selling `qty` into `inventory`, in `[0, 0.7]`.
pub fn slippage(qty: f32, inventory: f32) -> f32 {
    if qty <= 0.0 {
        return 0.0;
    }
    let ratio = qty / (inventory + qty).max(1.0);
    (SLIPPAGE_K * ratio + SLIPPAGE_ROOT * ratio.sqrt()).clamp(0.0, SLIPPAGE_CAP)
}

/// Sells a fraction of held cargo. Selling nothing is a valid no-op.
pub fn sell(state: &mut SimState, commodity: usize, fraction: SellFraction) {
    let qty = state.ship.cargo[commodity] * fraction.value();
    if qty <= 0.0 {
        return;
    }
    let entry = &mut state.market.commodities[commodity];
    let effective_price = entry.price * (1.0 - slippage(qty, entry.inventory));
    state.ship.credits += qty * effective_price;
    state.ship.cargo[commodity] = (state.ship.cargo[commodity] - qty).max(0.0);
    entry.inventory += qty;
    entry.recent_sales += qty;
}

fn charge(state: &mut SimState, cost: f32) -> Result<(), TradeRejection> {
    if state.ship.credits < cost {
        return Err(TradeRejection::InsufficientCredits);
    }
    state.ship.credits -= cost;
    state.stats.total_spend += cost;
    Ok(())
}

fn refuel(state: &mut SimState, (qty, cost): (f32, f32)) -> Result<(), TradeRejection> {
    charge(state, cost)?;
    state.ship.fuel = FUEL_MAX.min(state.ship.fuel + qty);
    Ok(())
}

fn check_supply(state: &SimState, cost: f32, held: u8, cap: u8) -> Result<(), TradeRejection> {
    if state.ship.credits < cost {
        return Err(TradeRejection::InsufficientCredits);
    }
    if held >= cap {
        return Err(TradeRejection::AtCapacity);
    }
    Ok(())
}

/// Fuel tiers refuse only on funds; consumables also refuse at their cap.
pub fn purchase(state: &mut SimState, item: PurchaseItem) -> Result<(), TradeRejection> {
    match item {
        PurchaseItem::FuelSmall => refuel(state, FUEL_SMALL),
        PurchaseItem::FuelMedium => refuel(state, FUEL_MEDIUM),
        PurchaseItem::FuelLarge => refuel(state, FUEL_LARGE),
        PurchaseItem::RepairKit => {
            check_supply(state, REPAIR_KIT_COST, state.ship.repair_kits, REPAIR_KITS_CAP)?;
            charge(state, REPAIR_KIT_COST)?;
            state.ship.repair_kits += 1;
            Ok(())
        }
        PurchaseItem::Stabilizer => {
            check_supply(state, STABILIZER_COST, state.ship.stabilizers, STABILIZERS_CAP)?;
            charge(state, STABILIZER_COST)?;
            state.ship.stabilizers += 1;
            Ok(())
        }
        PurchaseItem::Decoy => {
            check_supply(state, DECOY_COST, state.ship.decoys, DECOYS_CAP)?;
            charge(state, DECOY_COST)?;
            state.ship.decoys += 1;
            Ok(())
        }
    }
}

/// Restores hull and tool to full for a fixed fee.
pub fn overhaul(state: &mut SimState) -> Result<(), TradeRejection> {
    charge(state, OVERHAUL_COST)?;
    state.ship.hull = HULL_MAX;
    state.ship.tool = TOOL_MAX;
    Ok(())
}

/// Advances prices by `dt` ticks; draws one normal per commodity.
pub fn update_market(state: &mut SimState, dt: u16) {
    let t = (state.ticks_elapsed + u32::from(dt)) as f32;
    let noise_scale = f32::from(dt.max(1)).sqrt();
    let commodities = &mut state.market.commodities;

    for entry in commodities.iter_mut() {
        entry.prev_price = entry.price;
    }

    for (index, entry) in commodities.iter_mut().enumerate() {
        let cycle = entry.amplitude * (TWO_PI * (t / entry.period) + entry.phase).sin();
        let inventory_pressure = INVENTORY_PRESSURE_K * entry.inventory;
        let sale_pressure = SALES_PRESSURE_K * entry.recent_sales;
        let noise_std = MARKET_NOISE_K * PRICE_BASE[index] * noise_scale;
        let noise = state.rng.normal(0.0, noise_std);
        let price = PRICE_BASE[index] + cycle - inventory_pressure - sale_pressure + noise;
        entry.price = price.clamp(PRICE_MIN[index], PRICE_MAX[index]);
    }

    let decay = (-f32::from(dt) / SALES_DECAY_TAU).exp();
    for entry in commodities.iter_mut() {
        entry.recent_sales *= decay;
        entry.inventory = (entry.inventory * INVENTORY_DECAY).max(0.0);
    }
}
