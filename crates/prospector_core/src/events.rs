//! Replay event tags derived from consecutive step results.

use crate::engine::StepResult;
use crate::metrics::StepMetrics;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepEvent {
    InvalidAction,
    PirateEncounter,
    OverheatTick,
    Terminated,
    Truncated,
}

/// Tags for `result`, given the metrics reported by the step before it
/// (`None` on the first step of an episode).
pub fn derive_events(result: &StepResult, previous: Option<&StepMetrics>) -> Vec<StepEvent> {
    let baseline = previous.copied().unwrap_or_default();
    let mut events = Vec::new();
    if result.invalid_action {
        events.push(StepEvent::InvalidAction);
    }
    if result.metrics.pirate_encounters > baseline.pirate_encounters {
        events.push(StepEvent::PirateEncounter);
    }
    if result.metrics.overheat_ticks > baseline.overheat_ticks {
        events.push(StepEvent::OverheatTick);
    }
    if result.terminated {
        events.push(StepEvent::Terminated);
    }
    if result.truncated {
        events.push(StepEvent::Truncated);
    }
    events
}
