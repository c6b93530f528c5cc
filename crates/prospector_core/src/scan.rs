//! Estimate updates driven by scan and listen actions.

use crate::constants::{MAX_ASTEROIDS, N_COMMODITIES};
use crate::rng::Pcg32;
use crate::{Asteroid, SimState};

const PROB_FLOOR: f32 = 1.0e-8;
const THREAT_LISTEN_NOISE: f32 = 0.08;
const THREAT_LISTEN_KEEP: f32 = 0.25;
const THREAT_LISTEN_BLEND: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Wide,
    Focused,
    Deep,
}

struct ScanProfile {
    blend: f32,
    confidence_gain: f32,
    noise_mult: f32,
}

impl ScanMode {
    fn profile(self) -> ScanProfile {
        match self {
            ScanMode::Wide => ScanProfile {
                blend: 0.22,
                confidence_gain: 0.10,
                noise_mult: 1.35,
            },
            ScanMode::Focused => ScanProfile {
                blend: 0.42,
                confidence_gain: 0.20,
                noise_mult: 1.0,
            },
            ScanMode::Deep => ScanProfile {
                blend: 0.80,
                confidence_gain: 0.45,
                noise_mult: 0.55,
            },
        }
    }

    pub fn confidence_gain(self) -> f32 {
        self.profile().confidence_gain
    }
}

/// Floors each component at 1e-8 and divides by the floored sum.
pub fn normalize_probs(values: &[f32; N_COMMODITIES]) -> [f32; N_COMMODITIES] {
    let mut out = [0.0_f32; N_COMMODITIES];
    let mut sum = 0.0_f32;
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value.max(PROB_FLOOR);
        sum += *slot;
    }
    if sum <= 0.0 {
        return [1.0 / N_COMMODITIES as f32; N_COMMODITIES];
    }
    for slot in &mut out {
        *slot /= sum;
    }
    out
}

/// Blends a noisy observation of the truth into one asteroid's estimate.
///
/// Draws six composition normals then one stability normal.
pub fn update_estimate(asteroid: &mut Asteroid, mode: ScanMode, rng: &mut Pcg32) {
    let profile = mode.profile();
    let estimate = &mut asteroid.estimate;
    let sigma = asteroid.noise_profile * (1.0 - estimate.confidence + 0.1) * profile.noise_mult;

    let mut noisy = [0.0_f32; N_COMMODITIES];
    for (value, truth) in noisy.iter_mut().zip(&asteroid.composition) {
        *value = truth + rng.normal(0.0, sigma);
    }
    let noisy = normalize_probs(&noisy);

    let mut mixed = [0.0_f32; N_COMMODITIES];
    for ((value, prior), observed) in mixed.iter_mut().zip(&estimate.composition).zip(&noisy) {
        *value = (1.0 - profile.blend) * prior + profile.blend * observed;
    }
    estimate.composition = normalize_probs(&mixed);

    let stability_noisy = (asteroid.stability + rng.normal(0.0, sigma)).clamp(0.0, 1.0);
    estimate.stability = ((1.0 - profile.blend) * estimate.stability
        + profile.blend * stability_noisy)
        .clamp(0.0, 1.0);
    estimate.confidence = (estimate.confidence + profile.confidence_gain).clamp(0.0, 1.0);
}

/// Wide scan: low-blend update of every asteroid at the current node, in slot order.
pub fn wide_scan(state: &mut SimState) {
    let node = state.ship.node;
    for slot in 0..MAX_ASTEROIDS {
        if let Some(asteroid) = state.world.nodes[node].asteroids[slot].as_mut() {
            update_estimate(asteroid, ScanMode::Wide, &mut state.rng);
        }
    }
}

/// Moves every outgoing edge's threat estimate toward a noisy reading of the truth.
pub fn listen_for_threats(state: &mut SimState) {
    let node = state.ship.node;
    for edge in state.world.nodes[node].edges.iter_mut().flatten() {
        let noisy = (edge.threat + state.rng.normal(0.0, THREAT_LISTEN_NOISE)).clamp(0.0, 1.0);
        edge.threat_estimate = THREAT_LISTEN_KEEP * edge.threat_estimate + THREAT_LISTEN_BLEND * noisy;
    }
}
