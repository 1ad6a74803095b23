//! Ratio-constrained dependent sampler.
//!
//! Given an independent value `x` and a band `[ratio_min, ratio_max]`, picks an
//! integer dependent value `k` with `ratio_min <= k / x <= ratio_max`. When a
//! previous ratio is supplied, the pick keeps `|k / x - previous| >=
//! min_difference` so that neighbouring units do not report near-identical
//! ratios.
//!
//! # Selection
//!
//! | Situation                                   | Rule                                     |
//! |---------------------------------------------|------------------------------------------|
//! | no previous ratio, or `min_difference <= 0` | midpoint of `[k_min, k_max]` plus jitter |
//! | spacing satisfiable                         | uniform among the spaced integers        |
//! | spacing unsatisfiable                       | boundary with the larger difference      |
//!
//! Uniform selection first tries bounded rejection draws over `[k_min, k_max]`.
//! When those miss, the spaced integers form at most two sub-intervals below
//! and above the previous ratio; their bounds are computed directly and one
//! integer is drawn by index, so the cost does not grow with `x`.

use crate::retry::{retry_with_fallback, RetryPolicy};
use crate::rng::SynthRng;
use synth_core::math::rounding::round_half_up;
use synth_core::types::{RatioConstraint, SynthError};
use tracing::debug;

/// Default share of the half-width used as midpoint jitter.
pub const DEFAULT_JITTER: f64 = 0.25;

/// Default number of rejection draws before enumerating candidates.
pub const DEFAULT_SPACING_ATTEMPTS: usize = 50;

/// Precision used to strip binary noise from `ratio * x` before ceil/floor.
const PRODUCT_DECIMALS: u32 = 9;

/// Closed integer range admissible for the dependent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DependentRange {
    /// Smallest admissible integer
    pub k_min: i64,
    /// Largest admissible integer
    pub k_max: i64,
}

impl DependentRange {
    /// Number of integers in the range.
    #[inline]
    pub fn len(&self) -> usize {
        (self.k_max - self.k_min + 1) as usize
    }

    /// Always false; a derived range holds at least one integer.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns true if `k` lies in the range.
    #[inline]
    pub fn contains(&self, k: i64) -> bool {
        k >= self.k_min && k <= self.k_max
    }
}

/// Derive `[ceil(ratio_min * x), floor(ratio_max * x)]`.
///
/// A band too narrow to contain an integer produces `k_min > k_max`; the two
/// bounds are then swapped so the result is always usable.
///
/// # Returns
///
/// * `Err(SynthError::InvalidRequest)` - `x` not finite and positive
///
/// # Example
///
/// ```
/// use synth_core::types::RatioConstraint;
/// use synth_sampling::ratio::admissible_range;
///
/// let band = RatioConstraint::new(0.0488, 0.0555).unwrap();
/// let range = admissible_range(6000.0, &band).unwrap();
/// assert_eq!((range.k_min, range.k_max), (293, 333));
/// ```
pub fn admissible_range(
    x: f64,
    constraint: &RatioConstraint,
) -> Result<DependentRange, SynthError> {
    if !(x.is_finite() && x > 0.0) {
        return Err(SynthError::request(format!(
            "independent value must be positive, got {}",
            x
        )));
    }
    let (lo, hi) = if constraint.ratio_min <= constraint.ratio_max {
        (constraint.ratio_min, constraint.ratio_max)
    } else {
        (constraint.ratio_max, constraint.ratio_min)
    };
    let k_min = round_half_up(lo * x, PRODUCT_DECIMALS).ceil() as i64;
    let k_max = round_half_up(hi * x, PRODUCT_DECIMALS).floor() as i64;
    Ok(if k_min <= k_max {
        DependentRange { k_min, k_max }
    } else {
        DependentRange {
            k_min: k_max,
            k_max: k_min,
        }
    })
}

/// How the dependent integer was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Selection {
    /// Midpoint plus jitter; no spacing requirement
    Midpoint,
    /// Rejection draw satisfying the spacing
    Spaced {
        /// Draws consumed
        attempts: usize,
    },
    /// Uniform pick over the spaced sub-intervals
    Enumerated,
    /// No integer satisfies the spacing; farthest boundary used
    BoundaryFallback,
}

/// Parameters of one dependent-value draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioRequest {
    /// Independent value `x`
    pub independent: f64,
    /// Admissible ratio band
    pub constraint: RatioConstraint,
    /// Ratio of the previous unit, if any
    pub previous_ratio: Option<f64>,
    /// Required ratio spacing from `previous_ratio`
    pub min_difference: f64,
    /// Midpoint jitter as a share of the half-width
    pub jitter: f64,
    /// Add sub-unit digits to the chosen integer
    pub fractional_noise: bool,
    /// Rejection budget before enumeration
    pub policy: RetryPolicy,
}

impl RatioRequest {
    /// Request without spacing or noise.
    pub fn new(independent: f64, constraint: RatioConstraint) -> Self {
        Self {
            independent,
            constraint,
            previous_ratio: None,
            min_difference: 0.0,
            jitter: DEFAULT_JITTER,
            fractional_noise: false,
            policy: RetryPolicy::new(DEFAULT_SPACING_ATTEMPTS),
        }
    }

    /// Require spacing from the previous unit's ratio.
    pub fn with_previous(mut self, previous_ratio: Option<f64>, min_difference: f64) -> Self {
        self.previous_ratio = previous_ratio;
        self.min_difference = min_difference;
        self
    }

    /// Override the midpoint jitter share (clamped to `[0, 1]` when sampling).
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Enable or disable sub-unit noise.
    pub fn with_fractional_noise(mut self, enabled: bool) -> Self {
        self.fractional_noise = enabled;
        self
    }
}

/// Result of a dependent-value draw.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RatioSample {
    /// Reported dependent value (the integer, plus noise when enabled)
    pub dependent: f64,
    /// Chosen integer `k`
    pub integer: i64,
    /// `dependent / independent`
    pub ratio: f64,
    /// Admissible integer range
    pub range: DependentRange,
    /// Rule that produced `integer`
    pub selection: Selection,
}

/// Decimal places of noise for an integer of this magnitude.
fn noise_decimals(k: i64) -> Option<u32> {
    match k.unsigned_abs() {
        0..=99 => Some(2),
        100..=999 => Some(1),
        _ => None,
    }
}

/// Draw a dependent value satisfying the ratio band.
///
/// With fractional noise enabled the reported value is `k + u` rounded to
/// the magnitude's digit count and capped at `k_max`. Noise that would bring
/// the reported ratio closer to the previous one than `min_difference` (or
/// closer than `k / x` already is, when the spacing is unsatisfiable) is
/// dropped, so the spacing holds on the reported ratio.
///
/// # Returns
///
/// * `Err(SynthError::InvalidRequest)` - Non-positive independent value or
///   non-finite previous ratio / spacing
///
/// # Example
///
/// ```
/// use synth_core::types::RatioConstraint;
/// use synth_sampling::ratio::{sample_dependent, RatioRequest};
/// use synth_sampling::rng::SynthRng;
///
/// let band = RatioConstraint::new(0.0488, 0.0555).unwrap();
/// let mut rng = SynthRng::from_seed(3);
///
/// let first = sample_dependent(&RatioRequest::new(6000.0, band), &mut rng).unwrap();
/// assert!((293..=333).contains(&first.integer));
///
/// let next = RatioRequest::new(6000.0, band).with_previous(Some(first.ratio), 0.002);
/// let second = sample_dependent(&next, &mut rng).unwrap();
/// assert!((second.ratio - first.ratio).abs() >= 0.002);
/// ```
pub fn sample_dependent(
    request: &RatioRequest,
    rng: &mut SynthRng,
) -> Result<RatioSample, SynthError> {
    let x = request.independent;
    let range = admissible_range(x, &request.constraint)?;
    if !request.min_difference.is_finite() {
        return Err(SynthError::request("min difference must be finite"));
    }
    if matches!(request.previous_ratio, Some(p) if !p.is_finite()) {
        return Err(SynthError::request("previous ratio must be finite"));
    }

    let spacing = request
        .previous_ratio
        .filter(|_| request.min_difference > 0.0);

    let (integer, selection) = match spacing {
        Some(previous) => pick_spaced(
            &range,
            x,
            previous,
            request.min_difference,
            request.policy,
            rng,
        ),
        None => (pick_midpoint(&range, request.jitter, rng), Selection::Midpoint),
    };

    let mut dependent = integer as f64;
    if let Some(decimals) = noise_decimals(integer).filter(|_| request.fractional_noise) {
        let noisy =
            round_half_up(dependent + rng.gen_uniform(), decimals).min(range.k_max as f64);
        let keep = match spacing {
            Some(previous) => {
                let required = request
                    .min_difference
                    .min((dependent / x - previous).abs());
                (noisy / x - previous).abs() >= required
            }
            None => true,
        };
        if keep {
            dependent = noisy;
        } else {
            debug!(
                k = integer,
                noisy,
                previous = ?spacing,
                "fractional noise dropped to keep ratio spacing"
            );
        }
    }

    Ok(RatioSample {
        dependent,
        integer,
        ratio: dependent / x,
        range,
        selection,
    })
}

fn pick_midpoint(range: &DependentRange, jitter: f64, rng: &mut SynthRng) -> i64 {
    let mid = (range.k_min + range.k_max) as f64 / 2.0;
    let half_width = (range.k_max - range.k_min) as f64 / 2.0;
    let spread = half_width * jitter.clamp(0.0, 1.0);
    let k = round_half_up(mid + rng.gen_range_f64(-spread, spread), 0) as i64;
    k.clamp(range.k_min, range.k_max)
}

fn pick_spaced(
    range: &DependentRange,
    x: f64,
    previous: f64,
    min_difference: f64,
    policy: RetryPolicy,
    rng: &mut SynthRng,
) -> (i64, Selection) {
    let spaced = |k: i64| (k as f64 / x - previous).abs() >= min_difference;

    let retried = retry_with_fallback(
        policy,
        rng,
        |rng, _| {
            let k = rng.gen_range_i64(range.k_min, range.k_max);
            spaced(k).then_some(Some(k))
        },
        |rng| {
            let (below, above) = spaced_intervals(range, x, previous, min_difference);
            let below_len = below.map_or(0, |(lo, hi)| hi - lo + 1);
            let above_len = above.map_or(0, |(lo, hi)| hi - lo + 1);
            let total = below_len + above_len;
            if total <= 0 {
                return None;
            }
            let index = rng.gen_range_i64(0, total - 1);
            match (below, above) {
                (Some((lo, _)), _) if index < below_len => Some(lo + index),
                (_, Some((lo, _))) => Some(lo + index - below_len),
                _ => None,
            }
        },
    );

    match (retried.is_fallback(), retried.value) {
        (false, Some(k)) => (
            k,
            Selection::Spaced {
                attempts: retried.attempts,
            },
        ),
        (true, Some(k)) => (k, Selection::Enumerated),
        (_, None) => {
            let low_gap = (range.k_min as f64 / x - previous).abs();
            let high_gap = (range.k_max as f64 / x - previous).abs();
            let k = if high_gap > low_gap {
                range.k_max
            } else {
                range.k_min
            };
            debug!(
                k_min = range.k_min,
                k_max = range.k_max,
                previous,
                min_difference,
                chosen = k,
                "ratio spacing unsatisfiable, using farthest boundary"
            );
            (k, Selection::BoundaryFallback)
        }
    }
}

/// Bounds of the spaced integers below and above `previous`, clipped to
/// `range`. The estimates from `(previous -/+ min_difference) * x` are
/// corrected by a few unit steps against the exact spacing test.
fn spaced_intervals(
    range: &DependentRange,
    x: f64,
    previous: f64,
    min_difference: f64,
) -> (Option<(i64, i64)>, Option<(i64, i64)>) {
    const NUDGE_STEPS: usize = 3;
    let spaced = |k: i64| (k as f64 / x - previous).abs() >= min_difference;
    let below_side = |k: i64| spaced(k) && (k as f64 / x) < previous;
    let above_side = |k: i64| spaced(k) && (k as f64 / x) > previous;

    // Highest spaced integer below the previous ratio
    let mut below_end =
        round_half_up((previous - min_difference) * x, PRODUCT_DECIMALS).floor() as i64;
    below_end = below_end.clamp(range.k_min.saturating_sub(1), range.k_max);
    for _ in 0..NUDGE_STEPS {
        if below_end >= range.k_min && !below_side(below_end) {
            below_end -= 1;
        } else if below_end < range.k_max && below_side(below_end + 1) {
            below_end += 1;
        } else {
            break;
        }
    }
    let below = (below_end >= range.k_min && below_side(below_end))
        .then_some((range.k_min, below_end));

    // Lowest spaced integer above the previous ratio
    let mut above_start =
        round_half_up((previous + min_difference) * x, PRODUCT_DECIMALS).ceil() as i64;
    above_start = above_start.clamp(range.k_min, range.k_max.saturating_add(1));
    for _ in 0..NUDGE_STEPS {
        if above_start <= range.k_max && !above_side(above_start) {
            above_start += 1;
        } else if above_start > range.k_min && above_side(above_start - 1) {
            above_start -= 1;
        } else {
            break;
        }
    }
    let above = (above_start <= range.k_max && above_side(above_start))
        .then_some((above_start, range.k_max));

    (below, above)
}
