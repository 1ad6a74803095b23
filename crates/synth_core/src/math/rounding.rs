//! Half-up rounding and quantization.
//!
//! Reports print values with a fixed number of decimals, and hand-checked
//! tables expect `0.135 -> 0.14` even though `0.135 * 100` is
//! `13.499999999999998` in binary floating point. Every function here nudges
//! the scaled value by a relative epsilon before rounding so that decimal
//! halves round away from zero.

use crate::types::Range;

/// Relative nudge applied before rounding.
const HALF_UP_NUDGE: f64 = 1e-12;

/// Largest decimal count inferred for a quantization unit.
const MAX_GRID_DECIMALS: u32 = 12;

/// Round `value` half-up (away from zero) to `decimals` places.
///
/// Non-finite inputs are returned unchanged.
///
/// # Examples
///
/// ```
/// use synth_core::math::rounding::round_half_up;
///
/// assert_eq!(round_half_up(0.135, 2), 0.14);
/// assert_eq!(round_half_up(2.675, 2), 2.68);
/// assert_eq!(round_half_up(-1.25, 1), -1.3);
/// assert_eq!(round_half_up(1234.5, 0), 1235.0);
/// ```
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let nudged = scaled + scaled.signum() * HALF_UP_NUDGE * scaled.abs().max(1.0);
    let rounded = nudged.round() / factor;
    // Avoid printing "-0.00"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Number of decimals needed to represent multiples of `quantum` exactly.
///
/// # Examples
///
/// ```
/// use synth_core::math::rounding::grid_decimals;
///
/// assert_eq!(grid_decimals(10.0), 0);
/// assert_eq!(grid_decimals(0.5), 1);
/// assert_eq!(grid_decimals(0.01), 2);
/// ```
pub fn grid_decimals(quantum: f64) -> u32 {
    let quantum = quantum.abs();
    (0..=MAX_GRID_DECIMALS)
        .find(|&d| {
            let scaled = quantum * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-9 * scaled.max(1.0)
        })
        .unwrap_or(MAX_GRID_DECIMALS)
}

/// Round `value` to the nearest multiple of `quantum` (half-up).
///
/// A non-positive or non-finite quantum leaves the value unchanged. The
/// result is cleaned to the grid's decimal count so `0.1 + 0.2` style noise
/// never leaks into reports.
///
/// # Examples
///
/// ```
/// use synth_core::math::rounding::quantize;
///
/// assert_eq!(quantize(6124.9, 10.0), 6120.0);
/// assert_eq!(quantize(6125.0, 10.0), 6130.0);
/// assert_eq!(quantize(0.30000000000000004, 0.1), 0.3);
/// ```
pub fn quantize(value: f64, quantum: f64) -> f64 {
    if !(quantum.is_finite() && quantum > 0.0) {
        return value;
    }
    let steps = round_half_up(value / quantum, 0);
    round_half_up(steps * quantum, grid_decimals(quantum))
}

/// Quantize `value` and keep the result inside `range`.
///
/// Rounding a value clamped to a bound that is not itself on the grid can
/// step outside the range (`quantize(95.0, 10.0) == 100.0` for a range ending
/// at 95). In that case the neighbouring grid point towards the range is used.
/// Returns `None` when no grid point near `value` lies inside the range, which
/// happens when the range is narrower than one quantum.
///
/// # Examples
///
/// ```
/// use synth_core::math::rounding::quantize_within;
/// use synth_core::types::Range;
///
/// let range = Range::new(15.0, 95.0).unwrap();
/// assert_eq!(quantize_within(95.0, 10.0, &range), Some(90.0));
/// assert_eq!(quantize_within(15.0, 10.0, &range), Some(20.0));
///
/// let narrow = Range::new(12.0, 18.0).unwrap();
/// assert_eq!(quantize_within(15.0, 10.0, &narrow), None);
/// ```
pub fn quantize_within(value: f64, quantum: f64, range: &Range) -> Option<f64> {
    let quantized = quantize(value, quantum);
    if range.contains(quantized) {
        return Some(quantized);
    }
    if !(quantum.is_finite() && quantum > 0.0) {
        return None;
    }
    let inward = if quantized > range.max() {
        quantized - quantum
    } else {
        quantized + quantum
    };
    let inward = round_half_up(inward, grid_decimals(quantum));
    range.contains(inward).then_some(inward)
}

/// Format `value` half-up rounded to exactly `decimals` places.
///
/// Rust formatting is locale-independent, so the decimal separator is
/// always `.`.
///
/// # Examples
///
/// ```
/// use synth_core::math::rounding::format_fixed;
///
/// assert_eq!(format_fixed(0.135, 2), "0.14");
/// assert_eq!(format_fixed(5.0, 2), "5.00");
/// assert_eq!(format_fixed(-0.001, 2), "0.00");
/// ```
pub fn format_fixed(value: f64, decimals: u32) -> String {
    format!("{:.*}", decimals as usize, round_half_up(value, decimals))
}
