//! Packed little-endian trace records, one per tick.
//!
//! Layout (1108 bytes, no padding): `t: u32`, `action: u8`, `dt: u16`,
//! `reward: f32`, `terminated`/`truncated`/`invalid_action: u8`,
//! `resolved_action: i16`, `obs: [f32; 260]`, `metrics: [f32; 13]`.

use crate::constants::{N_METRICS, OBS_DIM};
use crate::engine::StepResult;
use crate::error::TraceError;
use crate::observation::Observation;

pub const RECORD_SIZE: usize = 4 + 1 + 2 + 4 + 3 + 2 + OBS_DIM * 4 + N_METRICS * 4;

#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord {
    pub t: u32,
    pub action: u8,
    pub dt: u16,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub invalid_action: bool,
    pub resolved_action: i16,
    pub obs: Observation,
    pub metrics: [f32; N_METRICS],
}

impl TraceRecord {
    /// Builds the record for step `t`, which was driven by raw byte `action`.
    pub fn from_step(t: u32, action: u8, result: &StepResult) -> Self {
        Self {
            t,
            action,
            dt: result.dt,
            reward: result.reward,
            terminated: result.terminated,
            truncated: result.truncated,
            invalid_action: result.invalid_action,
            resolved_action: result.resolved_action,
            obs: result.obs,
            metrics: result.metrics.to_array(),
        }
    }

    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0_u8; RECORD_SIZE];
        let mut writer = Writer { buf: &mut buf, pos: 0 };
        writer.put(&self.t.to_le_bytes());
        writer.put(&[self.action]);
        writer.put(&self.dt.to_le_bytes());
        writer.put(&self.reward.to_le_bytes());
        writer.put(&[
            u8::from(self.terminated),
            u8::from(self.truncated),
            u8::from(self.invalid_action),
        ]);
        writer.put(&self.resolved_action.to_le_bytes());
        for value in self.obs.iter().chain(&self.metrics) {
            writer.put(&value.to_le_bytes());
        }
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, TraceError> {
        if bytes.len() < RECORD_SIZE {
            return Err(TraceError::Truncated {
                expected: RECORD_SIZE,
                actual: bytes.len(),
            });
        }
        let mut reader = Reader { buf: bytes, pos: 0 };
        let t = u32::from_le_bytes(reader.take());
        let [action] = reader.take::<1>();
        let dt = u16::from_le_bytes(reader.take());
        let reward = f32::from_le_bytes(reader.take());
        let [terminated, truncated, invalid_action] = reader.take::<3>();
        let resolved_action = i16::from_le_bytes(reader.take());
        let mut obs = [0.0_f32; OBS_DIM];
        for value in &mut obs {
            *value = f32::from_le_bytes(reader.take());
        }
        let mut metrics = [0.0_f32; N_METRICS];
        for value in &mut metrics {
            *value = f32::from_le_bytes(reader.take());
        }
        Ok(Self {
            t,
            action,
            dt,
            reward,
            terminated: terminated != 0,
            truncated: truncated != 0,
            invalid_action: invalid_action != 0,
            resolved_action,
            obs,
            metrics,
        })
    }
}

/// Splits a whole trace file into records.
pub fn decode_trace(bytes: &[u8]) -> Result<Vec<TraceRecord>, TraceError> {
    let remainder = bytes.len() % RECORD_SIZE;
    if remainder != 0 {
        return Err(TraceError::TrailingBytes {
            record_size: RECORD_SIZE,
            remainder,
        });
    }
    bytes.chunks_exact(RECORD_SIZE).map(TraceRecord::decode).collect()
}

struct Writer<'a> {
    buf: &'a mut [u8; RECORD_SIZE],
    pos: usize,
}

impl Writer<'_> {
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }
}

// Callers check the length up front, so every take stays in bounds.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0_u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }
}
