use prospector_core::{par_reset_many, par_step_many, Engine, EngineBatch, EngineConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const INSTANCES: usize = 16;

fn seeds() -> Vec<u64> {
    (0..INSTANCES as u64).map(|i| 1_000 + i).collect()
}

#[test]
fn test_parallel_steps_match_serial_steps() {
    let config = EngineConfig::default();
    let mut serial = EngineBatch::new(config, &seeds()).unwrap();
    let mut parallel = EngineBatch::new(config, &seeds()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    for _ in 0..300 {
        let codes: Vec<u8> = (0..INSTANCES).map(|_| rng.gen_range(0..80)).collect();
        let a = serial.step_many(Some(codes.as_slice())).unwrap();
        let b = parallel.par_step_many(Some(codes.as_slice())).unwrap();
        assert_eq!(a, b);

        let finished: Vec<bool> = a.iter().map(|result| result.done()).collect();
        if finished.iter().any(|&done| done) {
            serial.reset_many(None).unwrap();
            parallel.par_reset_many(None).unwrap();
        }
    }
}

#[test]
fn test_free_functions_over_engine_slices() {
    let config = EngineConfig::default();
    let mut engines: Vec<Engine> = seeds().iter().map(|&s| Engine::new(config, s)).collect();
    let obs = par_reset_many(&mut engines, Some(seeds().as_slice())).unwrap();
    assert_eq!(obs.len(), INSTANCES);
    let results = par_step_many(&mut engines, None).unwrap();
    assert!(results.iter().all(|result| result.resolved_action == 6));
    assert!(par_step_many(&mut engines, Some(&[0, 1])).is_err());
}
