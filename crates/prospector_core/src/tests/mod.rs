use super::*;
use crate::actions::{
    DEEP_SCAN, DOCK, EMERGENCY_BURN, END_EPISODE, FOCUSED_SCAN, HOLD, HULL_PATCH, JETTISON_BASE,
    MINE_BASE, OVERHAUL, PURCHASE_BASE, REFINE, SELECT_BASE, SELL_BASE, STABILIZE,
    TOOL_MAINTENANCE, TRAVEL_BASE, WIDE_SCAN,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

mod engine;
mod rng;
mod trace;
mod world;

// --- Shared test helpers ------------------------------------------------

fn assert_close(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "{what}: expected {expected}, got {actual}"
    );
}

fn test_engine(seed: u64) -> Engine {
    Engine::new(EngineConfig::default(), seed)
}

/// First non-station node; every such node carries at least five asteroids.
fn field_node(engine: &Engine) -> usize {
    let world = &engine.state().world;
    (1..world.node_count)
        .find(|&index| world.nodes[index].kind != NodeKind::Station)
        .unwrap()
}

/// Teleports the ship to `node` and clears the selection.
fn move_to(engine: &mut Engine, node: usize) {
    let ship = &mut engine.state_mut().ship;
    ship.node = node;
    ship.selected = None;
}

/// Engine parked on a field node with nothing drawing hazard damage.
fn quiet_field_engine(seed: u64) -> (Engine, usize) {
    let mut engine = test_engine(seed);
    let node = field_node(&engine);
    move_to(&mut engine, node);
    let state = engine.state_mut();
    state.world.nodes[node].hazard = 0.0;
    state.world.nodes[node].pirate = 0.0;
    (engine, node)
}

/// Steps `codes` drawn uniformly from `0..80`, auto-resetting with
/// `seed + episode` like the trace harness does.
fn random_rollout(seed: u64, steps: usize) -> Vec<StepResult> {
    let mut engine = test_engine(seed);
    let mut actions = ChaCha8Rng::seed_from_u64(seed);
    let mut episode = 0_u64;
    let mut results = Vec::with_capacity(steps);
    for _ in 0..steps {
        let code: u8 = actions.gen_range(0..80);
        let result = engine.step(code);
        if result.done() {
            episode += 1;
            engine.reset(seed + episode);
        }
        results.push(result);
    }
    results
}

fn pattern_rollout(seed: u64, pattern: &[u8], steps: usize) -> Vec<StepResult> {
    let mut engine = test_engine(seed);
    let mut episode = 0_u64;
    let mut results = Vec::with_capacity(steps);
    for code in pattern.iter().copied().cycle().take(steps) {
        let result = engine.step(code);
        if result.done() {
            episode += 1;
            engine.reset(seed + episode);
        }
        results.push(result);
    }
    results
}

const STATION_MIX: [u8; 16] = [43, 61, 67, 28, 29, 30, 10, 9, 7, 33, 200, 253, 255, 6, 42, 68];
const FIELD_CYCLE: [u8; 14] = [8, 11, 12, 29, 33, 6, 0, 42, 45, 32, 35, 7, 6, 68];
