//! `prospector_core`: deterministic asteroid-prospecting simulation.
//!
//! No IO. All randomness comes from the per-instance [`Pcg32`], so a seed and
//! an action sequence fully determine a trajectory.

pub mod actions;
mod batch;
pub mod constants;
mod dispatch;
mod dynamics;
mod engine;
mod error;
mod events;
pub mod graph;
mod hazards;
mod market;
mod metrics;
mod mining;
pub mod observation;
mod reward;
mod rng;
mod scan;
pub mod trace;
mod types;
pub mod world;

pub use actions::{Action, MiningMode, PurchaseItem, SellFraction};
pub use batch::{reset_many, step_many, EngineBatch};
#[cfg(feature = "parallel")]
pub use batch::{par_reset_many, par_step_many};
pub use engine::{Engine, NodeContext, StepResult};
pub use error::{CoreError, TraceError};
pub use events::{derive_events, StepEvent};
pub use market::{slippage, TradeRejection};
pub use metrics::StepMetrics;
pub use mining::{heat_efficiency, tool_efficiency};
pub use observation::Observation;
pub use reward::{Outcome, RewardTerms, Snapshot};
pub use rng::Pcg32;
pub use scan::{normalize_probs, ScanMode};
pub use trace::{decode_trace, TraceRecord, RECORD_SIZE};
pub use types::*;

#[cfg(test)]
mod tests;
