use anyhow::{Context, Result};
use prospector_control::Suite;
use prospector_core::{Engine, EngineConfig, TraceRecord};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceStats {
    pub records: usize,
    pub episodes: u64,
}

/// Steps one engine through `actions`, writing one packed record per step.
///
/// Whenever a step ends the episode the engine is reset with
/// `seed + episode_index`, so a single action file can span many episodes.
pub fn record_trace<W: Write>(
    config: EngineConfig,
    seed: u64,
    actions: &[u8],
    out: &mut W,
) -> Result<TraceStats> {
    let mut engine = Engine::new(config, seed);
    let mut episode_index = 0_u64;

    for (t, &action) in actions.iter().enumerate() {
        let t = u32::try_from(t).context("action file longer than u32::MAX steps")?;
        let result = engine.step(action);
        let record = TraceRecord::from_step(t, action, &result);
        out.write_all(&record.encode())
            .with_context(|| format!("writing trace record {t}"))?;

        if result.done() {
            episode_index += 1;
            let next_seed = seed.wrapping_add(episode_index);
            debug!(t, next_seed, "auto-reset");
            engine.reset(next_seed);
        }
    }

    Ok(TraceStats {
        records: actions.len(),
        episodes: episode_index,
    })
}

pub fn trace(config: EngineConfig, seed: u64, actions_path: &Path, out_path: &Path) -> Result<()> {
    let actions = std::fs::read(actions_path)
        .with_context(|| format!("reading action file: {}", actions_path.display()))?;
    let file = std::fs::File::create(out_path)
        .with_context(|| format!("creating trace file: {}", out_path.display()))?;
    let mut writer = BufWriter::new(file);

    let stats = record_trace(config, seed, &actions, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("flushing {}", out_path.display()))?;

    info!(
        records = stats.records,
        episodes = stats.episodes,
        "trace written"
    );
    println!(
        "Wrote {} records ({} completed episodes) to {}",
        stats.records,
        stats.episodes,
        out_path.display()
    );
    Ok(())
}

/// Draws `steps` codes from `suite`, stepping a live engine so that
/// state-dependent sources see the world their actions will replay against.
pub fn generate_actions(config: EngineConfig, suite: Suite, seed: u64, steps: usize) -> Vec<u8> {
    let mut engine = Engine::new(config, seed);
    let mut source = suite.source(seed);
    let mut episode_index = 0_u64;
    let mut codes = Vec::with_capacity(steps);

    for _ in 0..steps {
        let code = source.next_action(engine.state());
        codes.push(code);
        if engine.step(code).done() {
            episode_index += 1;
            engine.reset(seed.wrapping_add(episode_index));
        }
    }
    codes
}

pub fn write_actions(
    config: EngineConfig,
    suite: Suite,
    seed: u64,
    steps: usize,
    out_path: &Path,
) -> Result<()> {
    let codes = generate_actions(config, suite, seed, steps);
    std::fs::write(out_path, &codes)
        .with_context(|| format!("writing action file: {}", out_path.display()))?;
    println!(
        "Wrote {} actions ({suite:?}, seed={seed}) to {}",
        codes.len(),
        out_path.display()
    );
    Ok(())
}
