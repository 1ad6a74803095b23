//! Error types for structured error handling.
//!
//! Every fallible operation in the workspace reports a [`SynthError`].
//! Retry exhaustion is deliberately absent: each bounded retry loop has a
//! deterministic fallback and never fails.

use thiserror::Error;

/// Categorised generator errors.
///
/// # Variants
/// - `InvalidDistribution`: Malformed weights or degenerate triangular bounds
/// - `DivisionByZero`: A derived formula received a zero denominator
/// - `InvalidRange`: Bounds with `min > max` or non-finite values
/// - `InvalidRequest`: Any other malformed sampler input
///
/// # Examples
/// ```
/// use synth_core::types::SynthError;
///
/// let err = SynthError::InvalidDistribution("empty outcome list".to_string());
/// assert_eq!(format!("{}", err), "Invalid distribution: empty outcome list");
///
/// let err = SynthError::DivisionByZero { context: "ratio_percent" };
/// assert!(format!("{}", err).contains("ratio_percent"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthError {
    /// Malformed categorical weights or degenerate triangular parameters.
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    /// Zero denominator in a derived-quantity formula.
    #[error("Division by zero in {context}: independent value is zero")]
    DivisionByZero {
        /// Name of the formula that was evaluated
        context: &'static str,
    },

    /// Range bounds are inverted or not finite.
    #[error("Invalid range: [{min}, {max}]")]
    InvalidRange {
        /// Lower bound supplied
        min: f64,
        /// Upper bound supplied
        max: f64,
    },

    /// Malformed sampler request (zero count, non-positive step, ...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SynthError {
    /// Create an invalid distribution error.
    pub fn distribution(msg: impl Into<String>) -> Self {
        Self::InvalidDistribution(msg.into())
    }

    /// Create an invalid request error.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}
