use anyhow::{bail, Result};
use prospector_core::EngineConfig;
use std::collections::HashMap;

const VALID_KEYS: &[&str] = &["time_max", "invalid_action_penalty"];

pub fn apply_overrides(
    config: &mut EngineConfig,
    overrides: &HashMap<String, serde_json::Value>,
) -> Result<()> {
    for (key, value) in overrides {
        match key.as_str() {
            "time_max" => config.time_max = as_f32(key, value)?,
            "invalid_action_penalty" => config.invalid_action_penalty = as_f32(key, value)?,
            _ => bail!(
                "unknown override key '{key}'. Valid keys: {}",
                VALID_KEYS.join(", ")
            ),
        }
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)] // JSON f64→f32 is intentional
fn as_f32(key: &str, value: &serde_json::Value) -> Result<f32> {
    value
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| anyhow::anyhow!("override '{key}': expected a number, got {value}"))
}
