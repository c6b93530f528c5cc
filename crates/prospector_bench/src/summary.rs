use crate::runner::SeedResult;
use prospector_core::StepMetrics;
use serde::Serialize;

type Extractor = (&'static str, Box<dyn Fn(&SeedResult) -> f64>);

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub seed_count: usize,
    pub episode_count: usize,
    pub failed_episode_count: usize,
    pub metrics: Vec<MetricSummary>,
}

#[derive(Debug, Serialize)]
pub struct MetricSummary {
    pub name: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

/// One extractor per step metric, in wire order.
fn metric_extractors() -> Vec<Extractor> {
    StepMetrics::NAMES
        .iter()
        .enumerate()
        .map(|(i, &name)| -> Extractor {
            (
                name,
                Box::new(move |r: &SeedResult| f64::from(r.final_metrics.to_array()[i])),
            )
        })
        .collect()
}

pub fn compute_summary(results: &[&SeedResult]) -> SummaryStats {
    let mut extractors: Vec<Extractor> = vec![
        ("steps_per_second", Box::new(|r: &SeedResult| r.steps_per_second)),
        ("episodes_completed", Box::new(|r: &SeedResult| r.episodes.len() as f64)),
        // Seeds with no finished episode count as zero return.
        ("mean_return", Box::new(|r: &SeedResult| r.mean_return.unwrap_or(0.0))),
        (
            "failure_rate",
            Box::new(|r: &SeedResult| {
                if r.episodes.is_empty() {
                    0.0
                } else {
                    r.episodes.iter().filter(|e| e.failed()).count() as f64
                        / r.episodes.len() as f64
                }
            }),
        ),
    ];
    extractors.extend(metric_extractors());

    let metrics = extractors
        .iter()
        .map(|(name, extract)| {
            let values: Vec<f64> = results.iter().map(|r| extract(r)).collect();
            compute_metric_summary(name, &values)
        })
        .collect();

    SummaryStats {
        seed_count: results.len(),
        episode_count: results.iter().map(|r| r.episodes.len()).sum(),
        failed_episode_count: results
            .iter()
            .flat_map(|r| &r.episodes)
            .filter(|e| e.failed())
            .count(),
        metrics,
    }
}

fn compute_metric_summary(name: &str, values: &[f64]) -> MetricSummary {
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    let stddev = variance.sqrt();

    MetricSummary {
        name: name.to_string(),
        mean,
        min,
        max,
        stddev,
    }
}

/// Aggregated metrics keyed by name:
/// `{ "key": { "mean": ..., "min": ..., "max": ..., "stddev": ... }, ... }`
pub fn build_aggregated_metrics(stats: &SummaryStats) -> serde_json::Value {
    let map = stats
        .metrics
        .iter()
        .map(|m| {
            (
                m.name.clone(),
                serde_json::json!({
                    "mean": m.mean,
                    "min": m.min,
                    "max": m.max,
                    "stddev": m.stddev,
                }),
            )
        })
        .collect();
    serde_json::Value::Object(map)
}

pub fn print_summary(scenario_name: &str, steps: u64, instances: usize, stats: &SummaryStats) {
    let step_display = if steps >= 1000 {
        format!("{}k", steps / 1000)
    } else {
        steps.to_string()
    };
    println!(
        "\n=== {} ({} seeds × {} instances, {} steps each) ===\n",
        scenario_name, stats.seed_count, instances, step_display
    );
    println!(
        "{:<26} {:>12} {:>12} {:>12} {:>12}",
        "Metric", "Mean", "Min", "Max", "StdDev"
    );
    println!("{}", "-".repeat(78));
    for metric in &stats.metrics {
        println!(
            "{:<26} {:>12.3} {:>12.3} {:>12.3} {:>12.3}",
            metric.name, metric.mean, metric.min, metric.max, metric.stddev
        );
    }
    println!(
        "{:<26} {}/{}",
        "failed_episodes", stats.failed_episode_count, stats.episode_count
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_result::EpisodeRow;

    fn episode(survival: f32, total_return: f64) -> EpisodeRow {
        EpisodeRow {
            seed: 1,
            instance: 0,
            episode: 0,
            episode_seed: 1,
            steps: 10,
            ticks: 10,
            total_return,
            terminated: true,
            truncated: false,
            credits: 0.0,
            net_profit: 0.0,
            survival,
            pirate_encounters: 0.0,
            scan_count: 0.0,
            mining_ticks: 0.0,
        }
    }

    fn seed_result(
        seed: u64,
        steps_per_second: f64,
        credits: f32,
        episodes: Vec<EpisodeRow>,
    ) -> SeedResult {
        let mean_return = if episodes.is_empty() {
            None
        } else {
            Some(episodes.iter().map(|e| e.total_return).sum::<f64>() / episodes.len() as f64)
        };
        SeedResult {
            seed,
            run_id: format!("run-{seed}"),
            steps_per_second,
            episodes,
            mean_return,
            final_metrics: StepMetrics {
                credits,
                ..StepMetrics::default()
            },
        }
    }

    #[test]
    fn test_summary_basic_stats() {
        let a = seed_result(1, 1000.0, 100.0, vec![episode(1.0, 2.0)]);
        let b = seed_result(2, 3000.0, 300.0, vec![episode(0.0, -4.0), episode(1.0, 0.0)]);
        let stats = compute_summary(&[&a, &b]);

        assert_eq!(stats.seed_count, 2);
        assert_eq!(stats.episode_count, 3);
        assert_eq!(stats.failed_episode_count, 1);

        let sps = &stats.metrics[0];
        assert_eq!(sps.name, "steps_per_second");
        assert!((sps.mean - 2000.0).abs() < 1e-9);
        assert!((sps.min - 1000.0).abs() < 1e-9);
        assert!((sps.max - 3000.0).abs() < 1e-9);
        assert!((sps.stddev - 1000.0).abs() < 1e-9);

        let credits = stats.metrics.iter().find(|m| m.name == "credits").unwrap();
        assert!((credits.mean - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_seed_without_episodes_counts_zero_return() {
        let a = seed_result(1, 10.0, 0.0, Vec::new());
        let stats = compute_summary(&[&a]);
        let ret = stats.metrics.iter().find(|m| m.name == "mean_return").unwrap();
        assert!(ret.mean.abs() < 1e-12);
    }

    #[test]
    fn test_stddev_zero_for_identical() {
        let a = seed_result(1, 500.0, 50.0, vec![episode(1.0, 1.0)]);
        let b = seed_result(2, 500.0, 50.0, vec![episode(1.0, 1.0)]);
        let stats = compute_summary(&[&a, &b]);
        for metric in &stats.metrics {
            assert!(
                metric.stddev.abs() < 1e-10,
                "stddev for {} should be 0, got {}",
                metric.name,
                metric.stddev
            );
        }
    }

    #[test]
    fn test_aggregated_metrics_has_all_keys() {
        let a = seed_result(1, 500.0, 50.0, vec![episode(1.0, 1.0)]);
        let stats = compute_summary(&[&a]);
        let agg = build_aggregated_metrics(&stats);
        let obj = agg.as_object().unwrap();

        assert_eq!(obj.len(), 4 + StepMetrics::NAMES.len());
        for key in StepMetrics::NAMES.iter().chain(&["steps_per_second", "failure_rate"]) {
            let entry = obj
                .get(*key)
                .unwrap_or_else(|| panic!("missing key: {key}"));
            assert!(entry.get("mean").is_some(), "missing mean for {key}");
            assert!(entry.get("stddev").is_some(), "missing stddev for {key}");
        }
    }
}
