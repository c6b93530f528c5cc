use anyhow::Context;
use prospector_core::constants::N_METRICS;
use prospector_core::StepMetrics;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct RunResult {
    pub run_schema_version: u32,
    pub run_status: String,
    pub run_id: String,
    pub seed: u64,
    pub scenario_name: String,
    pub scenario_params: serde_json::Value,
    pub instances: usize,
    pub batch_steps: u64,
    pub total_steps: u64,
    pub wall_time_ms: u64,
    pub steps_per_second: f64,
    pub episodes_completed: usize,
    pub episodes_failed: usize,
    pub mean_return: Option<f64>,
    pub final_metrics: StepMetrics,
    pub episodes_path: String,
}

/// One row of `episodes.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeRow {
    pub seed: u64,
    pub instance: usize,
    pub episode: u64,
    pub episode_seed: u64,
    pub steps: u64,
    pub ticks: u64,
    #[serde(rename = "return")]
    pub total_return: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub credits: f32,
    pub net_profit: f32,
    pub survival: f32,
    pub pirate_encounters: f32,
    pub scan_count: f32,
    pub mining_ticks: f32,
}

impl EpisodeRow {
    pub fn failed(&self) -> bool {
        self.survival < 0.5
    }
}

impl RunResult {
    /// Write JSON atomically: write to `.tmp` then rename.
    pub fn write_atomic(&self, path: &Path) -> anyhow::Result<()> {
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).context("serializing run result")?;
        let mut file = std::fs::File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        file.sync_all()
            .with_context(|| format!("syncing {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("renaming {} to {}", tmp_path.display(), path.display()))?;
        Ok(())
    }
}

pub fn write_episodes_csv(path: &Path, rows: &[EpisodeRow]) -> anyhow::Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing episode row")?;
    }
    writer.flush().context("flushing episode csv")?;
    Ok(())
}

/// Field-wise mean; `None` for an empty slice.
pub fn mean_metrics(metrics: &[StepMetrics]) -> Option<StepMetrics> {
    if metrics.is_empty() {
        return None;
    }
    let count = metrics.len() as f64;
    let mut sums = [0.0_f64; N_METRICS];
    for m in metrics {
        for (sum, value) in sums.iter_mut().zip(m.to_array()) {
            *sum += f64::from(value);
        }
    }
    #[allow(clippy::cast_possible_truncation)] // metrics are f32 on the wire
    let means = sums.map(|sum| (sum / count) as f32);
    Some(StepMetrics::from_array(means))
}
