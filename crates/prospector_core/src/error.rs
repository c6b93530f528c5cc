use std::fmt;

/// Failures surfaced by engine construction and batch calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Instance storage could not be reserved.
    Allocation { requested: usize },
    /// A per-instance slice did not match the batch size.
    BatchLengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Allocation { requested } => {
                write!(f, "failed to allocate {requested} engine instances")
            }
            CoreError::BatchLengthMismatch { expected, actual } => {
                write!(f, "batch has {expected} instances but {actual} inputs were given")
            }
        }
    }
}

impl std::error::Error for CoreError {}

/// Failures decoding a packed trace stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    Truncated { expected: usize, actual: usize },
    TrailingBytes { record_size: usize, remainder: usize },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Truncated { expected, actual } => {
                write!(f, "trace record truncated: expected {expected} bytes, got {actual}")
            }
            TraceError::TrailingBytes {
                record_size,
                remainder,
            } => write!(
                f,
                "trace length is not a multiple of {record_size}: {remainder} trailing bytes"
            ),
        }
    }
}

impl std::error::Error for TraceError {}
