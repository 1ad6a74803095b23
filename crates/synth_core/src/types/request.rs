//! Per-invocation sampler requests and results.
//!
//! All of these are short-lived values: a request is built for one reportable
//! unit, consumed by one sampler call and dropped.

use super::{Range, SynthError};

/// Default bound on delta redraws per walk step.
pub const DEFAULT_STEP_ATTEMPTS: usize = 20;

/// Request for one bounded random-walk sequence.
///
/// # Example
///
/// ```
/// use synth_core::types::{Range, SeriesRequest};
///
/// let range = Range::new(5000.0, 7000.0).unwrap();
/// let request = SeriesRequest::new(6, range, 200.0)
///     .with_quantum(10.0)
///     .with_anchor(Some(6120.0), 150.0);
///
/// assert!(request.validate().is_ok());
/// assert_eq!(request.anchor, Some(6120.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesRequest {
    /// Number of elements to generate
    pub count: usize,
    /// Bounds every element must respect
    pub range: Range,
    /// Maximum absolute difference between consecutive elements
    pub step_cap: f64,
    /// Value carried over from the previous sequence, if any
    pub anchor: Option<f64>,
    /// Half-width of the window around the anchor for the first element
    pub anchor_tolerance: f64,
    /// Quantization unit (e.g. `10.0` for "nearest ten")
    pub quantum: f64,
    /// Bound on delta redraws before a step falls back to the previous value
    pub max_step_attempts: usize,
}

impl SeriesRequest {
    /// Create an unanchored request with unit quantization.
    pub fn new(count: usize, range: Range, step_cap: f64) -> Self {
        Self {
            count,
            range,
            step_cap,
            anchor: None,
            anchor_tolerance: 0.0,
            quantum: 1.0,
            max_step_attempts: DEFAULT_STEP_ATTEMPTS,
        }
    }

    /// Anchor the first element near a carried-over value.
    pub fn with_anchor(mut self, anchor: Option<f64>, tolerance: f64) -> Self {
        self.anchor = anchor;
        self.anchor_tolerance = tolerance;
        self
    }

    /// Set the quantization unit.
    pub fn with_quantum(mut self, quantum: f64) -> Self {
        self.quantum = quantum;
        self
    }

    /// Set the bound on delta redraws per step.
    pub fn with_max_step_attempts(mut self, attempts: usize) -> Self {
        self.max_step_attempts = attempts;
        self
    }

    /// Check the request before sampling.
    ///
    /// # Returns
    ///
    /// * `Err(SynthError::InvalidRequest)` - Zero count, non-positive step cap or
    ///   quantum, negative anchor tolerance, or a non-finite anchor
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.count == 0 {
            return Err(SynthError::request("series count must be > 0"));
        }
        if !(self.step_cap.is_finite() && self.step_cap > 0.0) {
            return Err(SynthError::request(format!(
                "step cap must be positive, got {}",
                self.step_cap
            )));
        }
        if !(self.quantum.is_finite() && self.quantum > 0.0) {
            return Err(SynthError::request(format!(
                "quantum must be positive, got {}",
                self.quantum
            )));
        }
        if !(self.anchor_tolerance.is_finite() && self.anchor_tolerance >= 0.0) {
            return Err(SynthError::request(format!(
                "anchor tolerance must be non-negative, got {}",
                self.anchor_tolerance
            )));
        }
        if matches!(self.anchor, Some(a) if !a.is_finite()) {
            return Err(SynthError::request("anchor must be finite"));
        }
        Ok(())
    }
}

/// Admissible band for `dependent / independent`.
///
/// The band is not reordered at construction: a swapped band is normalised
/// when the integer range is derived, matching how degenerate inputs are
/// handled there.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatioConstraint {
    /// Lower ratio bound
    pub ratio_min: f64,
    /// Upper ratio bound
    pub ratio_max: f64,
}

impl RatioConstraint {
    /// Construct a ratio band.
    ///
    /// # Returns
    ///
    /// * `Err(SynthError::InvalidRequest)` - Non-finite or negative bound
    pub fn new(ratio_min: f64, ratio_max: f64) -> Result<Self, SynthError> {
        for bound in [ratio_min, ratio_max] {
            if !bound.is_finite() || bound < 0.0 {
                return Err(SynthError::request(format!(
                    "ratio bound must be finite and non-negative, got {}",
                    bound
                )));
            }
        }
        Ok(Self {
            ratio_min,
            ratio_max,
        })
    }

    /// Returns true if `ratio` lies within the band (in either bound order).
    pub fn admits(&self, ratio: f64) -> bool {
        let (lo, hi) = if self.ratio_min <= self.ratio_max {
            (self.ratio_min, self.ratio_max)
        } else {
            (self.ratio_max, self.ratio_min)
        };
        ratio >= lo && ratio <= hi
    }
}

/// Batch produced by the mean-targeted sampler.
///
/// When [`SampleBatch::is_fallback`] is true the last element was computed
/// from the target mean rather than drawn, so the elements are not i.i.d.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SampleBatch {
    /// Sampled values in draw order
    pub values: Vec<f64>,
    /// Arithmetic mean of `values`
    pub mean: f64,
    /// Number of rejection attempts consumed
    pub attempts: usize,
    /// Whether the deterministic fallback produced the batch
    pub fallback: bool,
}

impl SampleBatch {
    /// Build a batch, computing its mean.
    pub fn new(values: Vec<f64>, attempts: usize, fallback: bool) -> Self {
        let mean = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        Self {
            values,
            mean,
            attempts,
            fallback,
        }
    }

    /// Returns true if the last element is mean-driven.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Smallest value in the batch.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }
}

/// Value carried between successive invocations of one logical sequence.
///
/// The generator never stores this itself; the caller threads it from one
/// call to the next.
///
/// # Example
///
/// ```
/// use synth_core::types::AnchorState;
///
/// let mut anchor = AnchorState::empty();
/// assert_eq!(anchor.value(), None);
///
/// anchor.advance(6120.0);
/// assert_eq!(anchor.value(), Some(6120.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorState {
    value: Option<f64>,
}

impl AnchorState {
    /// No carried-over value.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start a sequence from a known value.
    pub fn from_value(value: f64) -> Self {
        Self { value: Some(value) }
    }

    /// Current carried-over value.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Replace the carried-over value with the last element of a sequence.
    pub fn advance(&mut self, last: f64) {
        self.value = Some(last);
    }
}
