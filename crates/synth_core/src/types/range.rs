//! Closed numeric bounds.

use super::SynthError;

/// Closed interval `[min, max]` with `min <= max`.
///
/// Immutable once constructed; every constructor validates the invariant.
///
/// # Example
///
/// ```
/// use synth_core::types::Range;
///
/// let range = Range::new(100.0, 400.0).unwrap();
/// assert_eq!(range.width(), 300.0);
/// assert_eq!(range.clamp(50.0), 100.0);
/// assert!(range.contains(250.0));
///
/// assert!(Range::new(4.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RangeRepr", into = "RangeRepr")
)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    /// Construct a range, rejecting inverted or non-finite bounds.
    ///
    /// # Returns
    ///
    /// * `Ok(Range)` - Valid bounds
    /// * `Err(SynthError::InvalidRange)` - `min > max`, or either bound is NaN/infinite
    pub fn new(min: f64, max: f64) -> Result<Self, SynthError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(SynthError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Construct from bounds already known to satisfy `min <= max`.
    pub(crate) fn from_ordered(min: f64, max: f64) -> Self {
        debug_assert!(min <= max);
        Self { min, max }
    }

    /// Degenerate range containing a single value.
    pub fn point(value: f64) -> Result<Self, SynthError> {
        Self::new(value, value)
    }

    /// Lower bound.
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// `max - min`.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Centre of the interval.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        self.min + 0.5 * self.width()
    }

    /// Returns true if `value` lies inside the closed interval.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp `value` into the interval.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Intersection with another range, or `None` when disjoint.
    pub fn intersect(&self, other: &Range) -> Option<Range> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then_some(Range { min, max })
    }

    /// Window of half-width `tolerance` around `center`, intersected with
    /// this range.
    ///
    /// Falls back to the full range when the window does not overlap it, so
    /// an anchor far outside the bounds never produces an empty interval.
    ///
    /// # Example
    ///
    /// ```
    /// use synth_core::types::Range;
    ///
    /// let range = Range::new(5000.0, 7000.0).unwrap();
    /// let window = range.around(6950.0, 100.0);
    /// assert_eq!((window.min(), window.max()), (6850.0, 7000.0));
    ///
    /// // Anchor far away from the range: full range is used
    /// assert_eq!(range.around(100.0, 50.0), range);
    /// ```
    pub fn around(&self, center: f64, tolerance: f64) -> Range {
        let tolerance = tolerance.abs();
        Range::new(center - tolerance, center + tolerance)
            .ok()
            .and_then(|window| self.intersect(&window))
            .unwrap_or(*self)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RangeRepr {
    min: f64,
    max: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RangeRepr> for Range {
    type Error = SynthError;

    fn try_from(repr: RangeRepr) -> Result<Self, Self::Error> {
        Range::new(repr.min, repr.max)
    }
}

#[cfg(feature = "serde")]
impl From<Range> for RangeRepr {
    fn from(range: Range) -> Self {
        Self {
            min: range.min,
            max: range.max,
        }
    }
}
