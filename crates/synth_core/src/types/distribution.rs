//! Distribution parameter types.
//!
//! Only the validated parameters live here; drawing from them needs a random
//! source and is implemented in `synth_sampling`.

use super::{Range, SynthError};

/// Tolerance on the total probability mass of a [`CategoricalDistribution`].
///
/// Weights written by hand in configuration files (`0.33, 0.33, 0.34`) or
/// produced by rounding rarely sum to exactly one.
pub const MASS_TOLERANCE: f64 = 1e-3;

/// A single outcome with its selection probability.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedOutcome<T> {
    /// Value returned when this outcome is selected
    pub value: T,
    /// Selection probability (non-negative)
    pub weight: f64,
}

impl<T> WeightedOutcome<T> {
    /// Create a weighted outcome.
    pub fn new(value: T, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// Non-empty, ordered set of weighted outcomes whose weights sum to one.
///
/// Outcome order matters: sampling accumulates weights in declaration order.
///
/// # Example
///
/// ```
/// use synth_core::types::{CategoricalDistribution, WeightedOutcome};
///
/// let dist = CategoricalDistribution::new(vec![
///     WeightedOutcome::new("low", 0.25),
///     WeightedOutcome::new("high", 0.75),
/// ])
/// .unwrap();
/// assert_eq!(dist.len(), 2);
///
/// // Arbitrary non-negative weights can be rescaled instead
/// let dist = CategoricalDistribution::normalized(vec![
///     WeightedOutcome::new(1, 2.0),
///     WeightedOutcome::new(2, 6.0),
/// ])
/// .unwrap();
/// assert_eq!(dist.outcomes()[1].weight, 0.75);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "Vec<WeightedOutcome<T>>",
        into = "Vec<WeightedOutcome<T>>",
        bound(
            serialize = "T: serde::Serialize + Clone",
            deserialize = "T: serde::Deserialize<'de>"
        )
    )
)]
pub struct CategoricalDistribution<T> {
    outcomes: Vec<WeightedOutcome<T>>,
}

impl<T> CategoricalDistribution<T> {
    /// Construct a distribution from outcomes whose weights already sum to one.
    ///
    /// # Returns
    ///
    /// * `Err(SynthError::InvalidDistribution)` - Empty list, a negative or
    ///   non-finite weight, or total mass further than [`MASS_TOLERANCE`] from one
    pub fn new(outcomes: Vec<WeightedOutcome<T>>) -> Result<Self, SynthError> {
        let total = validate_weights(&outcomes)?;
        if (total - 1.0).abs() > MASS_TOLERANCE {
            return Err(SynthError::distribution(format!(
                "weights sum to {}, expected 1",
                total
            )));
        }
        Ok(Self { outcomes })
    }

    /// Construct a distribution from arbitrary non-negative weights,
    /// rescaling them to unit mass.
    pub fn normalized(mut outcomes: Vec<WeightedOutcome<T>>) -> Result<Self, SynthError> {
        let total = validate_weights(&outcomes)?;
        if total <= 0.0 {
            return Err(SynthError::distribution("total weight is zero"));
        }
        for outcome in outcomes.iter_mut() {
            outcome.weight /= total;
        }
        Ok(Self { outcomes })
    }

    /// Outcomes in declaration order.
    #[inline]
    pub fn outcomes(&self) -> &[WeightedOutcome<T>] {
        &self.outcomes
    }

    /// Number of outcomes.
    #[inline]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Always false for a constructed distribution.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Returns the value of the first outcome whose cumulative weight reaches
    /// `u`, or the last outcome when rounding leaves the total just under `u`.
    ///
    /// `u` is expected in `[0, 1)`; drawing it is the caller's job.
    pub fn select(&self, u: f64) -> &T {
        let mut cumulative = 0.0;
        for outcome in &self.outcomes {
            cumulative += outcome.weight;
            if cumulative >= u {
                return &outcome.value;
            }
        }
        // Non-empty by construction
        &self.outcomes[self.outcomes.len() - 1].value
    }
}

fn validate_weights<T>(outcomes: &[WeightedOutcome<T>]) -> Result<f64, SynthError> {
    if outcomes.is_empty() {
        return Err(SynthError::distribution("outcome list is empty"));
    }
    let mut total = 0.0;
    for (index, outcome) in outcomes.iter().enumerate() {
        if !outcome.weight.is_finite() || outcome.weight < 0.0 {
            return Err(SynthError::distribution(format!(
                "weight at index {} is {}, must be non-negative",
                index, outcome.weight
            )));
        }
        total += outcome.weight;
    }
    Ok(total)
}

impl<T> TryFrom<Vec<WeightedOutcome<T>>> for CategoricalDistribution<T> {
    type Error = SynthError;

    fn try_from(outcomes: Vec<WeightedOutcome<T>>) -> Result<Self, Self::Error> {
        Self::new(outcomes)
    }
}

impl<T> From<CategoricalDistribution<T>> for Vec<WeightedOutcome<T>> {
    fn from(dist: CategoricalDistribution<T>) -> Self {
        dist.outcomes
    }
}

/// Parameters of a triangular distribution on `[low, high]` peaking at `mode`.
///
/// # Example
///
/// ```
/// use synth_core::types::TriangularSpec;
///
/// let spec = TriangularSpec::new(0.10, 0.19, 0.13).unwrap();
/// assert!((spec.mean() - 0.14).abs() < 1e-12);
///
/// // high == low is degenerate
/// assert!(TriangularSpec::new(1.0, 1.0, 1.0).is_err());
/// // mode outside the bounds
/// assert!(TriangularSpec::new(0.0, 1.0, 2.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "TriangularRepr", into = "TriangularRepr")
)]
pub struct TriangularSpec {
    low: f64,
    high: f64,
    mode: f64,
}

impl TriangularSpec {
    /// Construct triangular parameters.
    ///
    /// # Returns
    ///
    /// * `Err(SynthError::InvalidDistribution)` - `high == low`, `mode` outside
    ///   `[low, high]`, or any non-finite parameter
    pub fn new(low: f64, high: f64, mode: f64) -> Result<Self, SynthError> {
        if !low.is_finite() || !high.is_finite() || !mode.is_finite() {
            return Err(SynthError::distribution(
                "triangular parameters must be finite",
            ));
        }
        if high <= low {
            return Err(SynthError::distribution(format!(
                "triangular bounds are degenerate: low={}, high={}",
                low, high
            )));
        }
        if mode < low || mode > high {
            return Err(SynthError::distribution(format!(
                "triangular mode {} outside [{}, {}]",
                mode, low, high
            )));
        }
        Ok(Self { low, high, mode })
    }

    /// Lower bound.
    #[inline]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound.
    #[inline]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Peak of the density.
    #[inline]
    pub fn mode(&self) -> f64 {
        self.mode
    }

    /// Support of the distribution.
    #[inline]
    pub fn range(&self) -> Range {
        Range::from_ordered(self.low, self.high)
    }

    /// Expected value `(low + high + mode) / 3`.
    #[inline]
    pub fn mean(&self) -> f64 {
        (self.low + self.high + self.mode) / 3.0
    }

    /// Inverse CDF evaluated at `u ∈ [0, 1)`.
    ///
    /// With `F = (mode - low) / (high - low)`:
    /// - `u < F`: `low + sqrt(u (high - low)(mode - low))`
    /// - otherwise: `high - sqrt((1 - u)(high - low)(high - mode))`
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        let span = self.high - self.low;
        let split = (self.mode - self.low) / span;
        let x = if u < split {
            self.low + (u * span * (self.mode - self.low)).sqrt()
        } else {
            self.high - ((1.0 - u) * span * (self.high - self.mode)).sqrt()
        };
        // Guard against last-ulp drift past the bounds
        x.clamp(self.low, self.high)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct TriangularRepr {
    low: f64,
    high: f64,
    mode: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<TriangularRepr> for TriangularSpec {
    type Error = SynthError;

    fn try_from(repr: TriangularRepr) -> Result<Self, Self::Error> {
        TriangularSpec::new(repr.low, repr.high, repr.mode)
    }
}

#[cfg(feature = "serde")]
impl From<TriangularSpec> for TriangularRepr {
    fn from(spec: TriangularSpec) -> Self {
        Self {
            low: spec.low,
            high: spec.high,
            mode: spec.mode,
        }
    }
}
