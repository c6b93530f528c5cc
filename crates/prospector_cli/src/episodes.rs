use anyhow::{Context, Result};
use prospector_control::Suite;
use prospector_core::{Engine, EngineConfig, NodeContext, StepMetrics, StepResult};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub episode: u64,
    pub seed: u64,
    pub steps: u64,
    pub ticks: u64,
    #[serde(rename = "return")]
    pub total_return: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub invalid_actions: u64,
    pub metrics: StepMetrics,
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub seed: u64,
    pub steps: u64,
    pub suite: Suite,
    pub print_every: u64,
    pub json: bool,
}

#[derive(Default)]
struct Accumulator {
    steps: u64,
    ticks: u64,
    total_return: f64,
    invalid_actions: u64,
}

impl Accumulator {
    fn push(&mut self, result: &StepResult) {
        self.steps += 1;
        self.ticks += u64::from(result.dt);
        self.total_return += f64::from(result.reward);
        self.invalid_actions += u64::from(result.invalid_action);
    }

    fn finish(&self, episode: u64, seed: u64, result: &StepResult) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            seed,
            steps: self.steps,
            ticks: self.ticks,
            total_return: self.total_return,
            terminated: result.terminated,
            truncated: result.truncated,
            invalid_actions: self.invalid_actions,
            metrics: result.metrics,
        }
    }
}

/// Runs `steps` actions from `suite`, resetting with `seed + episode_index`
/// after every finished episode. Returns the completed episodes.
pub fn run(config: EngineConfig, opts: RunOptions) -> Result<Vec<EpisodeSummary>> {
    let mut engine = Engine::new(config, opts.seed);
    let mut source = opts.suite.source(opts.seed);
    let mut episodes = Vec::new();
    let mut acc = Accumulator::default();
    let mut episode_seed = opts.seed;

    println!(
        "Starting run: seed={} steps={} suite={:?} time_max={} invalid_penalty={}",
        opts.seed,
        opts.steps,
        opts.suite,
        engine.config().time_max,
        engine.config().invalid_action_penalty,
    );
    println!("{}", "-".repeat(80));

    for step in 1..=opts.steps {
        let code = source.next_action(engine.state());
        let result = engine.step(code);
        acc.push(&result);

        if opts.print_every > 0 && step % opts.print_every == 0 {
            print_status(step, &engine, &result);
        }

        if result.done() {
            let index = episodes.len() as u64;
            let summary = acc.finish(index, episode_seed, &result);
            print_episode(&summary, opts.json)?;
            episodes.push(summary);

            acc = Accumulator::default();
            episode_seed = opts.seed.wrapping_add(index + 1);
            engine.reset(episode_seed);
        }
    }

    println!("{}", "-".repeat(80));
    println!(
        "Done. {} episodes completed, {} steps into the current one.",
        episodes.len(),
        acc.steps
    );
    info!(episodes = episodes.len(), "run finished");
    Ok(episodes)
}

fn print_status(step: u64, engine: &Engine, result: &StepResult) {
    let ship = &engine.state().ship;
    let place = match result.node_context {
        NodeContext::Station => "station",
        NodeContext::Field => "field",
    };
    println!(
        "[step={step:06}  t_left={t_left:7.1}  {place:7}]  \
         fuel={fuel:6.1}  hull={hull:5.1}  heat={heat:5.1}  \
         cargo={cargo:6.1}  credits={credits:9.1}",
        t_left = result.time_remaining,
        fuel = ship.fuel,
        hull = ship.hull,
        heat = ship.heat,
        cargo = ship.cargo.iter().sum::<f32>(),
        credits = ship.credits,
    );
}

fn print_episode(summary: &EpisodeSummary, json: bool) -> Result<()> {
    if json {
        let line = serde_json::to_string(summary).context("serializing episode summary")?;
        println!("{line}");
        return Ok(());
    }
    let end = if summary.truncated {
        "truncated"
    } else {
        "terminated"
    };
    println!(
        "*** EPISODE {} ({end}) seed={} steps={} ticks={} return={:.3} \
         credits={:.1} survived={} invalid={} ***",
        summary.episode,
        summary.seed,
        summary.steps,
        summary.ticks,
        summary.total_return,
        summary.metrics.credits,
        summary.metrics.survival > 0.5,
        summary.invalid_actions,
    );
    Ok(())
}
