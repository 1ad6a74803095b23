//! Bounded random-walk sequence generation.
//!
//! Produces an ordered, quantized sequence inside a [`Range`] where
//! consecutive elements differ by at most a step cap. The first element is
//! optionally drawn near an anchor carried over from the previous sequence;
//! the last element is returned so the caller can anchor the next one.
//!
//! # Algorithm
//!
//! 1. First element: uniform in the range, or in
//!    `[max(min, anchor - tol), min(max, anchor + tol)]` when anchored (full
//!    range if that window misses the range), then quantized.
//! 2. Each further element: delta uniform in `[-step_cap, step_cap]` (a zero
//!    delta becomes the smallest nonzero step), `clamp(prev + delta)`,
//!    quantize, and redraw the delta while the quantized step exceeds the cap.
//!    After `max_step_attempts` redraws the previous value is repeated.
//!
//! # Quantization at the boundaries
//!
//! Quantizing after clamping can leave the range when a bound is not on the
//! quantization grid: a range ending at 95 with quantum 10 clamps 97 to 95
//! and rounds it to 100. Such points are moved one grid unit back inside and
//! counted in [`WalkSequence::boundary_adjustments`]. If no grid point lies
//! inside the range at all (range narrower than one quantum), the clamped
//! value is kept unquantized and its index is listed in
//! [`WalkSequence::off_grid`]. Because the step check runs on the final
//! placed value, the step cap itself is never exceeded. A cap smaller than
//! half the quantum collapses the walk to a constant, since every accepted
//! step rounds back onto the previous grid point.

use crate::retry::{retry_with_fallback, RetryPolicy};
use crate::rng::SynthRng;
use synth_core::math::rounding::{quantize, quantize_within};
use synth_core::types::{Range, SeriesRequest, SynthError};
use tracing::debug;

/// Output of one bounded walk.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WalkSequence {
    /// Generated elements in order
    pub values: Vec<f64>,
    /// Last element, to be used as the next sequence's anchor
    pub last: f64,
    /// Steps where the attempt budget ran out and the previous value was kept
    pub held_steps: usize,
    /// Points moved one grid unit inward because rounding left the range
    pub boundary_adjustments: usize,
    /// Indices whose value could not be placed on the grid inside the range
    pub off_grid: Vec<usize>,
}

impl WalkSequence {
    /// Largest absolute difference between consecutive elements.
    pub fn max_step(&self) -> f64 {
        self.values
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).abs())
            .fold(0.0, f64::max)
    }
}

/// A clamped, quantized candidate element.
#[derive(Debug, Clone, Copy)]
struct Placement {
    value: f64,
    on_grid: bool,
    adjusted: bool,
}

impl Placement {
    fn held(value: f64) -> Self {
        Self {
            value,
            on_grid: true,
            adjusted: false,
        }
    }
}

fn place(raw: f64, range: &Range, quantum: f64) -> Placement {
    let clamped = range.clamp(raw);
    match quantize_within(clamped, quantum, range) {
        Some(value) => Placement {
            value,
            on_grid: true,
            adjusted: value != quantize(clamped, quantum),
        },
        None => Placement {
            value: clamped,
            on_grid: false,
            adjusted: false,
        },
    }
}

/// Generate a bounded random walk.
///
/// # Returns
///
/// * `Ok(WalkSequence)` - Always succeeds for a valid request; bounded
///   retries fall back to repeating the previous value
/// * `Err(SynthError::InvalidRequest)` - See [`SeriesRequest::validate`]
///
/// # Example
///
/// ```
/// use synth_core::types::{Range, SeriesRequest};
/// use synth_sampling::rng::SynthRng;
/// use synth_sampling::walk::generate_walk;
///
/// let range = Range::new(5000.0, 7000.0).unwrap();
/// let request = SeriesRequest::new(6, range, 200.0).with_quantum(10.0);
///
/// let mut rng = SynthRng::from_seed(1);
/// let first = generate_walk(&request, &mut rng).unwrap();
/// assert!(first.values.iter().all(|v| range.contains(*v)));
/// assert!(first.max_step() <= 200.0);
///
/// // Next floor continues near where this one ended
/// let next = request.with_anchor(Some(first.last), 100.0);
/// let second = generate_walk(&next, &mut rng).unwrap();
/// assert!((second.values[0] - first.last).abs() <= 110.0);
/// ```
pub fn generate_walk(
    request: &SeriesRequest,
    rng: &mut SynthRng,
) -> Result<WalkSequence, SynthError> {
    request.validate()?;

    let range = &request.range;
    let cap = request.step_cap;
    let cap_slack = 1e-9 * cap.max(1.0);
    let min_step = request.quantum.min(cap);
    let policy = RetryPolicy::new(request.max_step_attempts);

    let quantum = request.quantum;
    let mut boundary_adjustments = 0;
    let mut values = Vec::with_capacity(request.count);
    let mut off_grid = Vec::new();
    let mut held_steps = 0;

    let window = match request.anchor {
        Some(anchor) => range.around(anchor, request.anchor_tolerance),
        None => *range,
    };
    let first = place(rng.gen_range_f64(window.min(), window.max()), range, quantum);
    if !first.on_grid {
        off_grid.push(0);
    }
    boundary_adjustments += usize::from(first.adjusted);
    values.push(first.value);

    for index in 1..request.count {
        let previous = values[index - 1];
        let retried = retry_with_fallback(
            policy,
            rng,
            |rng, _| {
                let mut delta = rng.gen_range_f64(-cap, cap);
                if delta == 0.0 {
                    delta = min_step * rng.gen_sign();
                }
                let placed = place(previous + delta, range, quantum);
                ((placed.value - previous).abs() <= cap + cap_slack).then_some(placed)
            },
            |_| Placement::held(previous),
        );

        if retried.is_fallback() {
            held_steps += 1;
            debug!(
                index,
                previous,
                step_cap = cap,
                attempts = retried.attempts,
                "walk step budget exhausted, holding previous value"
            );
        }

        let placed = retried.value;
        if !placed.on_grid {
            off_grid.push(index);
        }
        boundary_adjustments += usize::from(placed.adjusted);
        values.push(placed.value);
    }

    let last = values[values.len() - 1];
    Ok(WalkSequence {
        values,
        last,
        held_steps,
        boundary_adjustments,
        off_grid,
    })
}
