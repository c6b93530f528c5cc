use anyhow::{bail, Context, Result};
use prospector_control::Suite;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Batch steps per seed; each step advances every instance once.
    pub steps: u64,
    #[serde(default = "default_instances")]
    pub instances: usize,
    pub seeds: SeedSpec,
    #[serde(default = "default_policy")]
    pub policy: Suite,
    /// Step instances with rayon inside each seed, on top of the per-seed fan-out.
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub overrides: HashMap<String, serde_json::Value>,
}

fn default_instances() -> usize {
    1
}

fn default_policy() -> Suite {
    Suite::Random
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SeedSpec {
    List(Vec<u64>),
    Range { range: [u64; 2] },
}

impl SeedSpec {
    pub fn expand(&self) -> Vec<u64> {
        match self {
            SeedSpec::List(seeds) => seeds.clone(),
            SeedSpec::Range { range } => (range[0]..=range[1]).collect(),
        }
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario file: {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&json)
        .with_context(|| format!("parsing scenario file: {}", path.display()))?;
    if scenario.name.is_empty() {
        bail!("scenario 'name' must not be empty");
    }
    if scenario.steps == 0 {
        bail!("scenario 'steps' must be > 0");
    }
    if scenario.instances == 0 {
        bail!("scenario 'instances' must be > 0");
    }
    if scenario.seeds.expand().is_empty() {
        bail!("scenario 'seeds' must produce at least one seed");
    }
    Ok(scenario)
}
