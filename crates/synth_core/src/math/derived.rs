//! Derived-quantity formulas.
//!
//! Secondary report columns (uncertainties, ratios) are computed from already
//! sampled values with fixed formulas:
//!
//! | Quantity | Formula |
//! |----------|---------|
//! | Proportional (type B) uncertainty | `value * coefficient / sqrt(3)` |
//! | Expanded uncertainty | `coverage * standard` |
//! | Ratio in percent | `100 * dependent / independent` |
//! | Combined uncertainty | `sqrt(u1^2 + u2^2)` |
//! | Ratio uncertainty | `ratio * sqrt((u_d / d)^2 + (u_i / i)^2)` |
//!
//! All formulas are generic over [`num_traits::Float`] and side-effect free.
//! Formulas with a denominator return [`SynthError::DivisionByZero`] rather than
//! an infinite value; the caller decides what to print instead.

use crate::types::SynthError;
use num_traits::Float;

/// Coverage factor for ~95% expanded uncertainty.
pub const DEFAULT_COVERAGE: f64 = 2.0;

#[inline]
fn lit<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

/// Standard uncertainty of a value whose relative error is uniformly
/// distributed within `±coefficient`.
///
/// # Example
///
/// ```
/// use synth_core::math::derived::proportional_uncertainty;
///
/// let u = proportional_uncertainty(300.0_f64, 0.08);
/// assert!((u - 300.0 * 0.08 / 3f64.sqrt()).abs() < 1e-12);
/// ```
#[inline]
pub fn proportional_uncertainty<T: Float>(value: T, coefficient: T) -> T {
    (value * coefficient / lit::<T>(3.0).sqrt()).abs()
}

/// Expanded uncertainty `coverage * standard`.
#[inline]
pub fn expanded_uncertainty<T: Float>(standard: T, coverage: T) -> T {
    coverage * standard
}

/// Ratio `dependent / independent`.
///
/// # Returns
///
/// * `Err(SynthError::DivisionByZero)` - `independent` is zero
pub fn ratio<T: Float>(dependent: T, independent: T) -> Result<T, SynthError> {
    if independent.is_zero() {
        return Err(SynthError::DivisionByZero { context: "ratio" });
    }
    Ok(dependent / independent)
}

/// Ratio expressed in percent, `100 * dependent / independent`.
///
/// # Example
///
/// ```
/// use synth_core::math::derived::ratio_percent;
/// use synth_core::types::SynthError;
///
/// assert_eq!(ratio_percent(300.0, 6000.0), Ok(5.0));
/// assert_eq!(
///     ratio_percent(300.0, 0.0),
///     Err(SynthError::DivisionByZero { context: "ratio_percent" })
/// );
/// ```
pub fn ratio_percent<T: Float>(dependent: T, independent: T) -> Result<T, SynthError> {
    if independent.is_zero() {
        return Err(SynthError::DivisionByZero {
            context: "ratio_percent",
        });
    }
    Ok(lit::<T>(100.0) * dependent / independent)
}

/// Root-sum-of-squares of two independent uncertainty components.
///
/// # Example
///
/// ```
/// use synth_core::math::derived::combined_uncertainty;
///
/// assert_eq!(combined_uncertainty(3.0_f64, 4.0), 5.0);
/// ```
#[inline]
pub fn combined_uncertainty<T: Float>(first: T, second: T) -> T {
    first.hypot(second)
}

/// Uncertainty of `ratio = dependent / independent` from the uncertainties of
/// both operands, combining relative uncertainties in quadrature.
///
/// `ratio` may be in any unit (plain or percent); the result is in the same unit.
///
/// # Returns
///
/// * `Err(SynthError::DivisionByZero)` - Either operand is zero
pub fn ratio_uncertainty<T: Float>(
    ratio: T,
    dependent: T,
    dependent_uncertainty: T,
    independent: T,
    independent_uncertainty: T,
) -> Result<T, SynthError> {
    if dependent.is_zero() || independent.is_zero() {
        return Err(SynthError::DivisionByZero {
            context: "ratio_uncertainty",
        });
    }
    Ok(relative_ratio_uncertainty(
        ratio,
        dependent_uncertainty / dependent,
        independent_uncertainty / independent,
    ))
}

/// Uncertainty of a ratio from the relative uncertainties of its operands.
///
/// Under proportional uncertainty the relative terms do not depend on the
/// values, so a zero dependent value is not an error here.
///
/// # Example
///
/// ```
/// use synth_core::math::derived::{proportional_uncertainty, relative_ratio_uncertainty};
///
/// let relative = proportional_uncertainty(1.0_f64, 0.08);
/// assert_eq!(relative_ratio_uncertainty(0.0, relative, relative), 0.0);
/// ```
#[inline]
pub fn relative_ratio_uncertainty<T: Float>(
    ratio: T,
    dependent_relative: T,
    independent_relative: T,
) -> T {
    (ratio * combined_uncertainty(dependent_relative, independent_relative)).abs()
}
