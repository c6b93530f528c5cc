use crate::run_result::{self, EpisodeRow, RunResult};
use crate::scenario::Scenario;
use anyhow::{Context, Result};
use prospector_core::{EngineBatch, EngineConfig, StepMetrics, StepResult};
use std::path::Path;
use std::time::Instant;
use tracing::debug;
use uuid::Uuid;

/// Instances of one seed start this far apart so their per-episode reseeds
/// (`instance_seed + episode_index`) never collide.
const INSTANCE_SEED_STRIDE: u64 = 1 << 32;

pub struct SeedResult {
    pub seed: u64,
    pub run_id: String,
    pub steps_per_second: f64,
    pub episodes: Vec<EpisodeRow>,
    pub mean_return: Option<f64>,
    pub final_metrics: StepMetrics,
}

pub fn instance_seed(seed: u64, instance: usize) -> u64 {
    seed.wrapping_add((instance as u64).wrapping_mul(INSTANCE_SEED_STRIDE))
}

/// Running totals for the episode an instance is currently in.
#[derive(Debug, Clone, Default)]
struct EpisodeTracker {
    episode: u64,
    episode_seed: u64,
    steps: u64,
    ticks: u64,
    total_return: f64,
}

impl EpisodeTracker {
    fn push(&mut self, result: &StepResult) {
        self.steps += 1;
        self.ticks += u64::from(result.dt);
        self.total_return += f64::from(result.reward);
    }

    fn close(&mut self, seed: u64, instance: usize, result: &StepResult) -> EpisodeRow {
        let row = EpisodeRow {
            seed,
            instance,
            episode: self.episode,
            episode_seed: self.episode_seed,
            steps: self.steps,
            ticks: self.ticks,
            total_return: self.total_return,
            terminated: result.terminated,
            truncated: result.truncated,
            credits: result.metrics.credits,
            net_profit: result.metrics.net_profit,
            survival: result.metrics.survival,
            pirate_encounters: result.metrics.pirate_encounters,
            scan_count: result.metrics.scan_count,
            mining_ticks: result.metrics.mining_ticks,
        };
        *self = Self {
            episode: self.episode + 1,
            episode_seed: instance_seed(seed, instance).wrapping_add(self.episode + 1),
            ..Self::default()
        };
        row
    }
}

struct Simulated {
    episodes: Vec<EpisodeRow>,
    terminal_metrics: Vec<StepMetrics>,
    last_results: Vec<StepResult>,
}

/// Steps every instance `scenario.steps` times, resetting finished ones in place.
fn simulate(
    scenario: &Scenario,
    config: EngineConfig,
    seed: u64,
    seeds: &[u64],
) -> Result<Simulated> {
    let mut batch = EngineBatch::new(config, seeds)
        .with_context(|| format!("allocating {} instances", seeds.len()))?;
    let mut sources: Vec<_> = seeds.iter().map(|&s| scenario.policy.source(s)).collect();
    let mut trackers: Vec<EpisodeTracker> = seeds
        .iter()
        .map(|&s| EpisodeTracker {
            episode_seed: s,
            ..EpisodeTracker::default()
        })
        .collect();

    let mut codes = vec![0_u8; seeds.len()];
    let mut out = Simulated {
        episodes: Vec::new(),
        terminal_metrics: Vec::new(),
        last_results: Vec::new(),
    };

    for _ in 0..scenario.steps {
        for ((code, source), engine) in codes.iter_mut().zip(&mut sources).zip(batch.engines()) {
            *code = source.next_action(engine.state());
        }
        let results = if scenario.parallel {
            batch.par_step_many(Some(codes.as_slice()))?
        } else {
            batch.step_many(Some(codes.as_slice()))?
        };

        for (instance, (result, tracker)) in results.iter().zip(&mut trackers).enumerate() {
            tracker.push(result);
            if result.done() {
                out.episodes.push(tracker.close(seed, instance, result));
                out.terminal_metrics.push(result.metrics);
                batch.engines_mut()[instance].reset(tracker.episode_seed);
            }
        }
        out.last_results = results;
    }
    Ok(out)
}

pub fn run_seed(
    scenario: &Scenario,
    config: EngineConfig,
    seed: u64,
    seed_dir: &Path,
    scenario_params: &serde_json::Value,
) -> Result<SeedResult> {
    let run_id = Uuid::new_v4().to_string();
    let start = Instant::now();

    let seeds: Vec<u64> = (0..scenario.instances)
        .map(|i| instance_seed(seed, i))
        .collect();
    let outcome = simulate(scenario, config, seed, &seeds)?;
    let episodes = outcome.episodes;

    let wall_time = start.elapsed();
    let total_steps = scenario.steps * seeds.len() as u64;
    let steps_per_second = if wall_time.as_secs_f64() > 0.0 {
        total_steps as f64 / wall_time.as_secs_f64()
    } else {
        0.0
    };

    let mean_return = if episodes.is_empty() {
        None
    } else {
        Some(episodes.iter().map(|e| e.total_return).sum::<f64>() / episodes.len() as f64)
    };
    let final_metrics = final_metrics(&outcome.terminal_metrics, &outcome.last_results);
    debug!(
        seed,
        episodes = episodes.len(),
        steps_per_second,
        "seed finished"
    );

    std::fs::create_dir_all(seed_dir)
        .with_context(|| format!("creating seed directory: {}", seed_dir.display()))?;
    run_result::write_episodes_csv(&seed_dir.join("episodes.csv"), &episodes)?;

    #[allow(clippy::cast_possible_truncation)]
    let wall_time_ms = wall_time.as_millis() as u64;
    let run_result = RunResult {
        run_schema_version: 1,
        run_status: "completed".to_string(),
        run_id: run_id.clone(),
        seed,
        scenario_name: scenario.name.clone(),
        scenario_params: scenario_params.clone(),
        instances: seeds.len(),
        batch_steps: scenario.steps,
        total_steps,
        wall_time_ms,
        steps_per_second,
        episodes_completed: episodes.len(),
        episodes_failed: episodes.iter().filter(|e| e.failed()).count(),
        mean_return,
        final_metrics,
        episodes_path: "episodes.csv".to_string(),
    };
    run_result
        .write_atomic(&seed_dir.join("run_result.json"))
        .context("writing run_result.json")?;

    Ok(SeedResult {
        seed,
        run_id,
        steps_per_second,
        episodes,
        mean_return,
        final_metrics,
    })
}

/// Mean terminal metrics of finished episodes, or the latest step's metrics
/// when no episode finished within the run.
fn final_metrics(terminal: &[StepMetrics], last: &[StepResult]) -> StepMetrics {
    run_result::mean_metrics(terminal)
        .or_else(|| {
            let latest: Vec<StepMetrics> = last.iter().map(|r| r.metrics).collect();
            run_result::mean_metrics(&latest)
        })
        .unwrap_or_default()
}
