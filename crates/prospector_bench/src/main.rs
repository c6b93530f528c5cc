use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prospector_core::EngineConfig;
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

mod overrides;
mod run_result;
mod runner;
mod scenario;
mod summary;

#[derive(Parser)]
#[command(
    name = "prospector_bench",
    about = "Scenario-driven throughput benchmark for the prospector engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file across multiple seeds.
    Run {
        /// Path to the scenario JSON file.
        #[arg(long)]
        scenario: String,
        /// Output directory (default: runs/).
        #[arg(long, default_value = "runs")]
        output_dir: String,
    },
}

#[allow(clippy::too_many_lines)]
fn run(scenario_path: &str, output_dir: &str) -> Result<()> {
    let scenario = scenario::load_scenario(Path::new(scenario_path))?;
    let seeds = scenario.seeds.expand();

    println!(
        "Loading scenario '{}': {} seeds × {} instances × {} steps (policy={:?}, parallel={})",
        scenario.name,
        seeds.len(),
        scenario.instances,
        scenario.steps,
        scenario.policy,
        scenario.parallel,
    );

    let mut config = EngineConfig::default();
    overrides::apply_overrides(&mut config, &scenario.overrides)?;
    let config = config.sanitized();

    let scenario_params = serde_json::json!({
        "steps": scenario.steps,
        "instances": scenario.instances,
        "policy": scenario.policy,
        "parallel": scenario.parallel,
        "config": config,
        "overrides": scenario.overrides,
    });

    // Create timestamped output directory.
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_dir = PathBuf::from(output_dir).join(format!("{}_{}", scenario.name, timestamp));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating output directory: {}", run_dir.display()))?;

    std::fs::copy(scenario_path, run_dir.join("scenario.json")).context("copying scenario file")?;

    println!("Output: {}", run_dir.display());
    println!("Running {} seeds in parallel...", seeds.len());

    let results: Vec<Result<runner::SeedResult>> = seeds
        .par_iter()
        .map(|&seed| {
            let seed_dir = run_dir.join(format!("seed_{seed}"));
            runner::run_seed(&scenario, config, seed, &seed_dir, &scenario_params)
                .with_context(|| format!("seed {seed}"))
        })
        .collect();

    let mut seed_results = Vec::new();
    for result in results {
        match result {
            Ok(seed_result) => seed_results.push(seed_result),
            Err(err) => {
                tracing::error!("{err:#}");
                eprintln!("Seed failed: {err:#}");
            }
        }
    }

    if seed_results.is_empty() {
        anyhow::bail!("all seeds failed");
    }

    seed_results.sort_by_key(|r| r.seed);
    for r in &seed_results {
        println!(
            "seed {:>6}: {:>12.0} steps/s  {:>5} episodes  mean_return={}",
            r.seed,
            r.steps_per_second,
            r.episodes.len(),
            r.mean_return
                .map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}")),
        );
    }

    let result_refs: Vec<&runner::SeedResult> = seed_results.iter().collect();
    let stats = summary::compute_summary(&result_refs);
    summary::print_summary(&scenario.name, scenario.steps, scenario.instances, &stats);

    let summary_path = run_dir.join("summary.json");
    let summary_json = serde_json::to_string_pretty(&stats).context("serializing summary")?;
    std::fs::write(&summary_path, summary_json)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    let batch_summary = serde_json::json!({
        "batch_schema_version": 1,
        "batch_id": Uuid::new_v4().to_string(),
        "scenario_name": scenario.name,
        "scenario_params": scenario_params,
        "seed_count": seed_results.len(),
        "run_ids": seed_results.iter().map(|r| r.run_id.as_str()).collect::<Vec<_>>(),
        "episode_count": stats.episode_count,
        "failed_episode_count": stats.failed_episode_count,
        "aggregated_metrics": summary::build_aggregated_metrics(&stats),
    });

    let batch_path = run_dir.join("batch_summary.json");
    let batch_tmp = batch_path.with_extension("json.tmp");
    let batch_json =
        serde_json::to_string_pretty(&batch_summary).context("serializing batch summary")?;
    let mut batch_file = std::fs::File::create(&batch_tmp)
        .with_context(|| format!("creating {}", batch_tmp.display()))?;
    batch_file
        .write_all(batch_json.as_bytes())
        .context("writing batch summary")?;
    batch_file
        .sync_all()
        .with_context(|| format!("syncing {}", batch_tmp.display()))?;
    std::fs::rename(&batch_tmp, &batch_path).context("renaming batch summary")?;

    println!("Summary written to {}", summary_path.display());
    println!("Batch summary written to {}", batch_path.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            scenario,
            output_dir,
        } => run(&scenario, &output_dir)?,
    }
    Ok(())
}
