use super::*;

fn same_bits(a: &StepResult, b: &StepResult) -> bool {
    a.reward.to_bits() == b.reward.to_bits()
        && a.terminated == b.terminated
        && a.truncated == b.truncated
        && a.invalid_action == b.invalid_action
        && a.dt == b.dt
        && a.resolved_action == b.resolved_action
        && a.obs.iter().zip(&b.obs).all(|(x, y)| x.to_bits() == y.to_bits())
        && a
            .metrics
            .to_array()
            .iter()
            .zip(&b.metrics.to_array())
            .all(|(x, y)| x.to_bits() == y.to_bits())
}

#[test]
fn test_random_rollouts_are_bit_identical() {
    for seed in [1_u64, 42, 12_345] {
        let a = random_rollout(seed, 2_000);
        let b = random_rollout(seed, 2_000);
        for (step, (x, y)) in a.iter().zip(&b).enumerate() {
            assert!(same_bits(x, y), "seed {seed} diverged at step {step}");
        }
    }
}

#[test]
fn test_pattern_rollouts_are_bit_identical() {
    for pattern in [&STATION_MIX[..], &FIELD_CYCLE[..]] {
        let a = pattern_rollout(7, pattern, 1_000);
        let b = pattern_rollout(7, pattern, 1_000);
        assert!(a.iter().zip(&b).all(|(x, y)| same_bits(x, y)));
    }
}

#[test]
fn test_reset_matches_fresh_engine() {
    let mut engine = test_engine(3);
    for code in [8, 0, 12, 29, 6] {
        engine.step(code);
    }
    let obs = engine.reset(11);
    let fresh = test_engine(11);
    assert_eq!(engine.state(), fresh.state());
    assert_eq!(obs, fresh.observation());
    assert!(!engine.is_finished());
}

#[test]
fn test_reset_keeps_configuration() {
    let config = EngineConfig {
        time_max: 500.0,
        invalid_action_penalty: 0.5,
    };
    let mut engine = Engine::new(config, 1);
    engine.reset(2);
    assert_eq!(engine.config(), config);
    assert_eq!(engine.seed(), 2);
    assert_close(engine.state().time_remaining, 500.0, "time budget");
}

#[test]
fn test_config_sanitizes_non_positive_values() {
    let engine = Engine::new(
        EngineConfig {
            time_max: -1.0,
            invalid_action_penalty: 0.0,
        },
        1,
    );
    assert_eq!(engine.config(), EngineConfig::default());
}

#[test]
fn test_config_serde_defaults_missing_fields() {
    let config: EngineConfig = serde_json::from_str(r#"{ "time_max": 300.0 }"#).unwrap();
    assert_close(config.time_max, 300.0, "time_max");
    assert_close(config.invalid_action_penalty, 0.01, "penalty");
    let json = serde_json::to_string(&config).unwrap();
    let back: EngineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_out_of_range_code_resolves_to_hold() {
    let mut engine = test_engine(1);
    for code in [69_u8, 200, 253, 255] {
        let result = engine.step(code);
        assert!(result.invalid_action);
        assert_eq!(result.resolved_action, i16::from(HOLD));
        assert_eq!(result.dt, 1);
    }
}

#[test]
fn test_invalid_code_applies_hold_twice() {
    let mut held = test_engine(1);
    let mut coerced = test_engine(1);
    for engine in [&mut held, &mut coerced] {
        engine.state_mut().ship.alert = 50.0;
        engine.state_mut().ship.heat = 50.0;
    }

    held.step(HOLD);
    coerced.step(200);

    // Global dynamics dissipate one more tick of heat on top of each hold.
    assert_close(held.state().ship.alert, 47.0, "hold alert");
    assert_close(held.state().ship.heat, 45.0, "hold heat");
    assert_close(coerced.state().ship.alert, 44.0, "coerced alert");
    assert_close(coerced.state().ship.heat, 42.5, "coerced heat");
}

#[test]
fn test_end_episode_then_post_terminal_short_circuit() {
    let mut engine = test_engine(5);
    engine.state_mut().ship.credits = 5_000.0;
    let last = engine.step(END_EPISODE);
    assert!(last.terminated);
    assert!(!last.truncated);
    assert!(!last.invalid_action);
    assert!(engine.is_finished());
    assert_close(last.metrics.survival, 1.0, "survival");
    assert_close(last.reward_terms.terminal, 0.01, "clean-end bonus");

    let state_before = engine.state().clone();
    let after = engine.step(HOLD);
    assert!(after.terminated);
    assert!(!after.truncated);
    assert!(after.invalid_action);
    assert_eq!(after.dt, 0);
    assert_eq!(after.resolved_action, -1);
    assert_eq!(after.reward.to_bits(), 0.0_f32.to_bits());
    assert_eq!(after.metrics, last.metrics);
    assert_eq!(after.obs, last.obs);
    assert_eq!(engine.state(), &state_before);
}

#[test]
fn test_post_terminal_keeps_failed_survival() {
    let (mut engine, _) = quiet_field_engine(2);
    engine.state_mut().ship.fuel = 1.0;
    let last = engine.step(EMERGENCY_BURN);
    assert!(last.terminated);
    assert_close(last.metrics.survival, 0.0, "survival");

    let after = engine.step(0);
    assert_eq!(after.metrics, last.metrics);
}

#[test]
fn test_stranded_off_station() {
    let (mut engine, _) = quiet_field_engine(2);
    engine.state_mut().ship.fuel = 1.0;
    let result = engine.step(EMERGENCY_BURN);
    assert!(result.terminated);
    assert_eq!(result.node_context, NodeContext::Field);
    assert_close(result.reward_terms.terminal, -50.0, "stranded penalty");
    assert_close(result.obs[0], 0.0, "fuel gauge");
}

#[test]
fn test_empty_tank_at_station_is_not_stranded() {
    let mut engine = test_engine(2);
    engine.state_mut().ship.fuel = 1.0;
    let result = engine.step(EMERGENCY_BURN);
    assert!(!result.terminated);
    assert_eq!(result.node_context, NodeContext::Station);
}

#[test]
fn test_overheat_destroys_hull() {
    let mut engine = test_engine(4);
    engine.state_mut().ship.heat = 200.0;
    let result = engine.step(HOLD);
    assert!(result.terminated);
    assert_close(result.metrics.overheat_ticks, 1.0, "overheat ticks");
    assert_close(result.metrics.survival, 0.0, "survival");
    assert_close(result.reward_terms.terminal, -100.0, "destroyed penalty");
    assert_close(engine.state().ship.heat, constants::HEAT_MAX, "heat capped");
}

#[test]
fn test_time_budget_truncates() {
    let config = EngineConfig {
        time_max: 3.0,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config, 8);
    assert!(!engine.step(HOLD).done());
    assert!(!engine.step(HOLD).done());
    let last = engine.step(HOLD);
    assert!(last.truncated);
    assert!(!last.terminated);
    assert_close(last.time_remaining, 0.0, "time remaining");
    assert_close(last.obs[6], 0.0, "time gauge");
}

#[test]
fn test_time_advances_by_dt() {
    let mut engine = test_engine(8);
    let result = engine.step(WIDE_SCAN);
    assert_eq!(result.dt, constants::WIDE_SCAN_TIME);
    assert_eq!(engine.state().ticks_elapsed, 3);
    assert_close(result.time_remaining, constants::TIME_MAX - 3.0, "time remaining");
}

#[test]
fn test_travel_moves_along_edge() {
    let mut engine = test_engine(12);
    let edge = engine.state().world.nodes[0].edges[0].unwrap();
    let result = engine.step(TRAVEL_BASE);
    assert!(!result.invalid_action);
    assert_eq!(result.dt, u16::from(edge.travel_time));
    assert_eq!(engine.state().ship.node, edge.to);
    assert_eq!(engine.state().ship.selected, None);
    assert_close(
        engine.state().ship.fuel,
        constants::FUEL_MAX - edge.fuel_cost,
        "fuel after empty-hold travel",
    );
}

#[test]
fn test_travel_through_empty_slot_is_invalid() {
    let mut engine = test_engine(12);
    let empty = engine.state().world.nodes[0]
        .edges
        .iter()
        .position(Option::is_none);
    if let Some(slot) = empty {
        let result = engine.step(TRAVEL_BASE + u8::try_from(slot).unwrap());
        assert!(result.invalid_action);
        assert_eq!(result.dt, 1);
        assert_eq!(engine.state().ship.node, 0);
    }
}

#[test]
fn test_heavy_cargo_costs_more_fuel() {
    let mut engine = test_engine(12);
    engine.state_mut().ship.cargo[0] = 200.0;
    let edge = engine.state().world.nodes[0].edges[0].unwrap();
    engine.step(TRAVEL_BASE);
    assert_close(
        engine.state().ship.fuel,
        constants::FUEL_MAX - edge.fuel_cost * 1.5,
        "fuel after full-hold travel",
    );
}

#[test]
fn test_mining_cycle_on_field_node() {
    let (mut engine, node) = quiet_field_engine(21);
    assert!(!engine.step(SELECT_BASE).invalid_action);
    assert_eq!(engine.state().ship.selected, Some(0));

    let result = engine.step(MINE_BASE);
    assert!(!result.invalid_action);
    assert_close(result.metrics.mining_ticks, 1.0, "mining ticks");
    let asteroid = engine.state().world.nodes[node].asteroids[0].unwrap();
    assert!(asteroid.depletion > 0.0);
    assert!(engine.state().ship.cargo_total() > 0.0);
}

#[test]
fn test_mine_without_selection_is_invalid() {
    let (mut engine, _) = quiet_field_engine(21);
    let result = engine.step(MINE_BASE + 1);
    assert!(result.invalid_action);
    assert_close(result.metrics.mining_ticks, 0.0, "mining ticks");
}

#[test]
fn test_selecting_depleted_asteroid_keeps_previous_selection() {
    let (mut engine, node) = quiet_field_engine(21);
    engine.step(SELECT_BASE);
    if let Some(asteroid) = engine.state_mut().world.nodes[node].asteroids[1].as_mut() {
        asteroid.depletion = 1.0;
    }
    let result = engine.step(SELECT_BASE + 1);
    assert!(result.invalid_action);
    assert_eq!(engine.state().ship.selected, Some(0));
}

#[test]
fn test_selecting_empty_slot_is_invalid() {
    let (mut engine, _) = quiet_field_engine(21);
    let result = engine.step(SELECT_BASE + 15);
    let occupied = engine.state().current_node().asteroids[15].is_some();
    assert_eq!(result.invalid_action, !occupied);
}

#[test]
fn test_stabilize_consumes_stabilizer() {
    let (mut engine, _) = quiet_field_engine(21);
    engine.step(SELECT_BASE);
    let result = engine.step(STABILIZE);
    assert!(!result.invalid_action);
    assert_eq!(result.dt, constants::STABILIZE_TIME);
    assert_eq!(engine.state().ship.stabilizers, constants::START_STABILIZERS - 1);
    // Two ticks of the six-tick buff elapsed during the action itself.
    assert_eq!(engine.state().ship.stabilize_buff[0], 4);
}

#[test]
fn test_stabilize_without_stock_is_invalid() {
    let (mut engine, _) = quiet_field_engine(21);
    engine.step(SELECT_BASE);
    engine.state_mut().ship.stabilizers = 0;
    let result = engine.step(STABILIZE);
    assert!(result.invalid_action);
    assert_eq!(result.dt, 1);
}

#[test]
fn test_focused_scan_without_target_still_costs_fuel() {
    let (mut engine, _) = quiet_field_engine(30);
    let result = engine.step(FOCUSED_SCAN);
    assert!(result.invalid_action);
    assert_eq!(result.dt, 1);
    assert_close(result.metrics.fuel_used, 4.0, "fuel used");
    assert_close(result.metrics.scan_count, 0.0, "scan count");
    assert_close(result.reward_terms.scan, -0.005, "scan surcharge");
    assert_close(result.reward_terms.invalid, -0.01, "invalid penalty");
}

#[test]
fn test_deep_scan_raises_confidence() {
    let (mut engine, node) = quiet_field_engine(30);
    engine.step(SELECT_BASE);
    let result = engine.step(DEEP_SCAN);
    assert!(!result.invalid_action);
    assert_eq!(result.dt, constants::DEEP_SCAN_TIME);
    assert_close(result.metrics.scan_count, 1.0, "scan count");
    let asteroid = engine.state().world.nodes[node].asteroids[0].unwrap();
    assert_close(asteroid.estimate.confidence, 0.55, "confidence");
    let sum: f32 = asteroid.estimate.composition.iter().sum();
    assert_close(sum, 1.0, "estimate simplex");
}

#[test]
fn test_wide_scan_counts_everywhere() {
    let mut engine = test_engine(30);
    let result = engine.step(WIDE_SCAN);
    assert!(!result.invalid_action);
    assert_close(result.metrics.scan_count, 1.0, "scan count");
    assert_close(result.metrics.fuel_used, 5.0, "fuel used");
}

#[test]
fn test_wide_scan_raises_every_confidence_at_node() {
    let (mut engine, node) = quiet_field_engine(42);
    let before: Vec<f32> = engine.state().world.nodes[node]
        .asteroids
        .iter()
        .flatten()
        .map(|a| a.estimate.confidence)
        .collect();
    assert!(!before.is_empty());

    let result = engine.step(WIDE_SCAN);
    assert_eq!(result.dt, 3);
    let after: Vec<f32> = engine.state().world.nodes[node]
        .asteroids
        .iter()
        .flatten()
        .map(|a| a.estimate.confidence)
        .collect();
    for (b, a) in before.iter().zip(&after) {
        let expected = (b + ScanMode::Wide.confidence_gain()).min(1.0);
        assert_close(*a, expected, "confidence after wide scan");
    }
}

#[test]
fn test_refine_converts_low_value_cargo() {
    let mut engine = test_engine(30);
    engine.state_mut().ship.cargo[0] = 100.0;
    engine.state_mut().ship.cargo[1] = 50.0;
    let result = engine.step(REFINE);
    assert_eq!(result.dt, constants::REFINE_TIME);
    let cargo = engine.state().ship.cargo;
    assert_close(cargo[0], 85.0, "commodity 0");
    assert_close(cargo[1], 42.5, "commodity 1");
    assert_close(cargo[4], 0.65 * 22.5, "refined output");
}

#[test]
fn test_jettison_clears_one_commodity() {
    let mut engine = test_engine(30);
    engine.state_mut().ship.cargo[2] = 40.0;
    engine.state_mut().ship.cargo[3] = 10.0;
    engine.state_mut().ship.alert = 20.0;
    engine.step(JETTISON_BASE + 2);
    let ship = &engine.state().ship;
    assert_close(ship.cargo[2], 0.0, "jettisoned");
    assert_close(ship.cargo[3], 10.0, "kept");
    assert_close(ship.alert, 12.0, "alert relief");
}

#[test]
fn test_repairs_need_kits() {
    let mut engine = test_engine(30);
    engine.state_mut().ship.tool = 50.0;
    engine.state_mut().ship.hull = 90.0;
    engine.step(TOOL_MAINTENANCE);
    engine.step(HULL_PATCH);
    let ship = &engine.state().ship;
    assert_close(ship.tool, 75.0, "tool");
    assert_close(ship.hull, 100.0, "hull capped");
    assert_eq!(ship.repair_kits, constants::START_REPAIR_KITS - 2);

    engine.state_mut().ship.repair_kits = 0;
    assert!(engine.step(TOOL_MAINTENANCE).invalid_action);
}

#[test]
fn test_batch_matches_individual_engines() {
    let seeds = [1_u64, 2, 3];
    let mut batch = EngineBatch::new(EngineConfig::default(), &seeds).unwrap();
    let mut singles: Vec<Engine> = seeds.iter().map(|&seed| test_engine(seed)).collect();

    for codes in [[8_u8, 0, 12], [29, 6, 200], [43, 61, 68]] {
        let batched = batch.step_many(Some(codes.as_slice())).unwrap();
        for ((engine, code), result) in singles.iter_mut().zip(codes).zip(&batched) {
            assert!(same_bits(&engine.step(code), result));
        }
    }
}

#[test]
fn test_batch_defaults() {
    let mut batch = EngineBatch::new(EngineConfig::default(), &[4, 5]).unwrap();
    let results = batch.step_many(None).unwrap();
    assert!(results
        .iter()
        .all(|result| result.resolved_action == i16::from(HOLD)));

    let obs = batch.reset_many(None).unwrap();
    assert_eq!(obs[0], test_engine(4).observation());
    assert_eq!(obs[1], test_engine(5).observation());
}

#[test]
fn test_batch_rejects_mismatched_lengths() {
    let mut batch = EngineBatch::new(EngineConfig::default(), &[4, 5]).unwrap();
    assert_eq!(
        batch.step_many(Some(&[6])).unwrap_err(),
        CoreError::BatchLengthMismatch {
            expected: 2,
            actual: 1
        }
    );
    assert!(batch.reset_many(Some(&[1, 2, 3])).is_err());
}

#[test]
fn test_events_follow_step_flags() {
    let mut engine = test_engine(4);
    let invalid = engine.step(250);
    assert_eq!(derive_events(&invalid, None), vec![StepEvent::InvalidAction]);

    engine.state_mut().ship.heat = 200.0;
    let fatal = engine.step(HOLD);
    let events = derive_events(&fatal, Some(&invalid.metrics));
    assert!(events.contains(&StepEvent::OverheatTick));
    assert!(events.contains(&StepEvent::Terminated));
    assert!(!events.contains(&StepEvent::InvalidAction));
}
