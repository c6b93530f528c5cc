use anyhow::{bail, Context, Result};
use prospector_core::{decode_trace, StepMetrics, TraceRecord};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub atol: f32,
    pub rtol: f32,
}

impl Tolerance {
    /// NaN matches NaN so a reproduced NaN is not reported as drift.
    fn close(self, expected: f32, actual: f32) -> bool {
        if expected.is_nan() || actual.is_nan() {
            return expected.is_nan() && actual.is_nan();
        }
        let scale = expected.abs().max(actual.abs());
        (expected - actual).abs() <= self.atol + self.rtol * scale
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub record: usize,
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record {}: field '{}' expected {} got {}",
            self.record, self.field, self.expected, self.actual
        )
    }
}

fn exact<T: PartialEq + fmt::Debug>(
    record: usize,
    field: &str,
    expected: T,
    actual: T,
) -> Option<Mismatch> {
    (expected != actual).then(|| Mismatch {
        record,
        field: field.to_string(),
        expected: format!("{expected:?}"),
        actual: format!("{actual:?}"),
    })
}

fn approx(
    tol: Tolerance,
    record: usize,
    field: &str,
    expected: f32,
    actual: f32,
) -> Option<Mismatch> {
    (!tol.close(expected, actual)).then(|| Mismatch {
        record,
        field: field.to_string(),
        expected: format!("{expected:?}"),
        actual: format!("{actual:?}"),
    })
}

fn compare_record(
    index: usize,
    expected: &TraceRecord,
    actual: &TraceRecord,
    tol: Tolerance,
) -> Option<Mismatch> {
    exact(index, "t", expected.t, actual.t)
        .or_else(|| exact(index, "action", expected.action, actual.action))
        .or_else(|| exact(index, "dt", expected.dt, actual.dt))
        .or_else(|| exact(index, "terminated", expected.terminated, actual.terminated))
        .or_else(|| exact(index, "truncated", expected.truncated, actual.truncated))
        .or_else(|| {
            exact(
                index,
                "invalid_action",
                expected.invalid_action,
                actual.invalid_action,
            )
        })
        .or_else(|| {
            exact(
                index,
                "resolved_action",
                expected.resolved_action,
                actual.resolved_action,
            )
        })
        .or_else(|| approx(tol, index, "reward", expected.reward, actual.reward))
        .or_else(|| {
            expected
                .obs
                .iter()
                .zip(&actual.obs)
                .enumerate()
                .find_map(|(i, (&e, &a))| approx(tol, index, &format!("obs[{i}]"), e, a))
        })
        .or_else(|| {
            StepMetrics::NAMES
                .iter()
                .zip(expected.metrics.iter().zip(&actual.metrics))
                .find_map(|(name, (&e, &a))| {
                    approx(tol, index, &format!("metrics.{name}"), e, a)
                })
        })
}

/// First divergence between two decoded traces, scanning record by record.
pub fn first_mismatch(
    expected: &[TraceRecord],
    actual: &[TraceRecord],
    tol: Tolerance,
) -> Option<Mismatch> {
    expected
        .iter()
        .zip(actual)
        .enumerate()
        .find_map(|(i, (e, a))| compare_record(i, e, a, tol))
        .or_else(|| {
            exact(
                expected.len().min(actual.len()),
                "record_count",
                expected.len(),
                actual.len(),
            )
        })
}

fn load(path: &Path) -> Result<Vec<TraceRecord>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading trace file: {}", path.display()))?;
    decode_trace(&bytes).with_context(|| format!("decoding trace file: {}", path.display()))
}

pub fn compare(expected_path: &Path, actual_path: &Path, tol: Tolerance) -> Result<()> {
    let expected = load(expected_path)?;
    let actual = load(actual_path)?;

    if let Some(mismatch) = first_mismatch(&expected, &actual, tol) {
        bail!("traces diverge at {mismatch}");
    }
    println!(
        "Traces match: {} records (atol={}, rtol={})",
        expected.len(),
        tol.atol,
        tol.rtol
    );
    Ok(())
}
