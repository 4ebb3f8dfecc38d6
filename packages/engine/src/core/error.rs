//! Engine error types
//!
//! Every fallible operation in the crate returns `EngineResult<T>`.
//! Boundary clipping (patterns and neighbor lookups that leave the grid)
//! is never an error: those cells are simply dropped.

use thiserror::Error;

/// Errors surfaced by configuration, pattern loading and the compute backends
#[derive(Error, Debug)]
pub enum EngineError {
    /// Grid must have at least one row and one column
    #[error("invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: u32, cols: u32 },

    /// Probability outside [0, 1] (or NaN)
    #[error("invalid probability for {name}: {value} (expected 0.0..=1.0)")]
    InvalidProbability { name: &'static str, value: f32 },

    /// Not a built-in pattern and no file at that path
    #[error("unknown pattern: {0}")]
    UnknownPattern(String),

    /// Pattern file parsed but a line is not a coordinate pair
    #[error("malformed pattern at line {line}: {reason}")]
    MalformedPattern { line: usize, reason: String },

    /// Pattern file exists but could not be read
    #[error("pattern io error: {0}")]
    PatternIo(#[from] std::io::Error),

    /// Pattern bundle JSON could not be decoded
    #[error("pattern bundle error: {0}")]
    PatternBundle(String),

    /// Configuration JSON could not be decoded
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Device acquisition, kernel timeout or kernel failure
    #[error("device error: {0}")]
    Device(String),
}

/// Result alias used across the engine
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            line,
            reason: reason.into(),
        }
    }

    /// Device failures are fatal for a parallel backend instance
    pub fn is_device(&self) -> bool {
        matches!(self, Self::Device(_))
    }
}
