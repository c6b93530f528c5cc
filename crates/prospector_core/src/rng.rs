//! PCG32 (XSH-RR) generator and the derived draws used by world generation
//! and the per-tick dynamics.
//!
//! Every helper consumes an exact, documented number of raw draws. Trajectories
//! are closed-form functions of draw order, so the helpers must not be
//! "improved" (no cached second Box-Muller value, no rejection sampling).

use crate::constants::{N_COMMODITIES, RNG_STREAM, TWO_PI};
use serde::{Deserialize, Serialize};

const PCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const UNIT_FLOOR: f32 = 1.0e-8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

impl Pcg32 {
    pub fn new(seed: u64, stream: u64) -> Self {
        let mut rng = Self {
            state: 0,
            inc: (stream << 1) | 1,
        };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    /// Generator on the stream every engine instance uses.
    pub fn for_world(seed: u64) -> Self {
        Self::new(seed, RNG_STREAM)
    }

    #[allow(clippy::cast_possible_truncation)] // XSH-RR keeps the low 32 bits
    fn step(&mut self) -> u32 {
        let old = self.state;
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        self.state = old
            .wrapping_mul(PCG_MULTIPLIER)
            .wrapping_add(self.inc);
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.step()
    }

    /// One draw scaled by 2^-32. The f64 → f32 rounding can yield exactly 1.0.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_f32(&mut self) -> f32 {
        (f64::from(self.next_u32()) / 4_294_967_296.0) as f32
    }

    /// `low + u32 % span`; returns `low` without drawing when the range is empty.
    pub fn range(&mut self, low: u32, high_exclusive: u32) -> u32 {
        if high_exclusive <= low {
            return low;
        }
        low + self.next_u32() % (high_exclusive - low)
    }

    pub fn uniform(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.next_f32()
    }

    pub fn exp_unit(&mut self) -> f32 {
        -self.next_f32().max(UNIT_FLOOR).ln()
    }

    /// Box-Muller, cosine branch only. Always consumes two draws.
    pub fn normal(&mut self, mean: f32, sigma: f32) -> f32 {
        let u1 = self.next_f32().max(UNIT_FLOOR);
        let u2 = self.next_f32();
        let magnitude = (-2.0 * u1.ln()).sqrt();
        mean + sigma * (magnitude * (TWO_PI * u2).cos())
    }

    pub fn lognormal(&mut self, mean: f32, sigma: f32) -> f32 {
        self.normal(mean, sigma).exp()
    }

    /// Beta(3, 2) as a ratio of exponential sums (five draws).
    pub fn beta_3_2(&mut self) -> f32 {
        let mut a = 0.0_f32;
        for _ in 0..3 {
            a += self.exp_unit();
        }
        let mut b = 0.0_f32;
        for _ in 0..2 {
            b += self.exp_unit();
        }
        let total = a + b;
        if total <= 0.0 {
            return 0.5;
        }
        a / total
    }

    /// Flat Dirichlet over the commodities (six draws).
    pub fn dirichlet(&mut self) -> [f32; N_COMMODITIES] {
        let mut out = [0.0_f32; N_COMMODITIES];
        let mut sum = 0.0_f32;
        for value in &mut out {
            *value = self.exp_unit();
            sum += *value;
        }
        if sum <= 0.0 {
            return [1.0 / N_COMMODITIES as f32; N_COMMODITIES];
        }
        for value in &mut out {
            *value /= sum;
        }
        out
    }
}

impl rand::RngCore for Pcg32 {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.step());
        let high = u64::from(self.step());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl rand::SeedableRng for Pcg32 {
    /// Little-endian seed followed by little-endian stream id.
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut word = [0u8; 8];
        word.copy_from_slice(&seed[..8]);
        let state_seed = u64::from_le_bytes(word);
        word.copy_from_slice(&seed[8..]);
        let stream = u64::from_le_bytes(word);
        Self::new(state_seed, stream)
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::for_world(state)
    }
}
