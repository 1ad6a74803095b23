//! Bounded retry with a deterministic fallback.
//!
//! Three samplers share the same shape: draw, test a constraint, try again,
//! and after a fixed budget give up on randomness and compute an answer
//! directly. This module is that shape, so the mean-targeted batch, the walk
//! step and the spaced ratio pick cannot drift apart.
//!
//! # Retry Policy
//!
//! - `max_attempts`: number of calls to the attempt closure (default 500)
//! - A zero budget goes straight to the fallback
//!
//! # Example
//!
//! ```
//! use synth_sampling::retry::{retry_with_fallback, RetryOutcome, RetryPolicy};
//!
//! let mut counter = 0;
//! let result = retry_with_fallback(
//!     RetryPolicy::new(5),
//!     &mut counter,
//!     |n, _attempt| {
//!         *n += 1;
//!         (*n == 3).then_some("drawn")
//!     },
//!     |_| "fallback",
//! );
//! assert_eq!(result.value, "drawn");
//! assert_eq!(result.attempts, 3);
//! assert_eq!(result.outcome, RetryOutcome::Accepted);
//! ```

/// Default attempt budget.
pub const DEFAULT_MAX_ATTEMPTS: usize = 500;

/// Attempt budget for a retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryPolicy {
    /// Maximum number of attempts before the fallback runs.
    pub max_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt budget.
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Policy that skips straight to the fallback.
    pub fn fallback_only() -> Self {
        Self { max_attempts: 0 }
    }
}

/// How a retried value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RetryOutcome {
    /// An attempt satisfied the constraint.
    Accepted,
    /// The budget ran out and the fallback produced the value.
    Fallback,
}

/// Value produced by [`retry_with_fallback`] together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Retried<T> {
    /// The produced value.
    pub value: T,
    /// Number of attempts consumed (equals the budget on fallback).
    pub attempts: usize,
    /// Whether an attempt or the fallback produced the value.
    pub outcome: RetryOutcome,
}

impl<T> Retried<T> {
    /// Returns true if the fallback produced the value.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.outcome == RetryOutcome::Fallback
    }

    /// Discard the bookkeeping and keep the value.
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Run `attempt` up to `policy.max_attempts` times, returning the first
/// `Some`. If every attempt returns `None`, run `fallback` once.
///
/// `state` (typically the random source) is threaded through both closures
/// so each can borrow it mutably in turn. The attempt closure also receives
/// the zero-based attempt index.
pub fn retry_with_fallback<S, T, A, F>(
    policy: RetryPolicy,
    state: &mut S,
    mut attempt: A,
    fallback: F,
) -> Retried<T>
where
    S: ?Sized,
    A: FnMut(&mut S, usize) -> Option<T>,
    F: FnOnce(&mut S) -> T,
{
    for index in 0..policy.max_attempts {
        if let Some(value) = attempt(state, index) {
            return Retried {
                value,
                attempts: index + 1,
                outcome: RetryOutcome::Accepted,
            };
        }
    }
    tracing::trace!(
        max_attempts = policy.max_attempts,
        "retry budget exhausted"
    );
    Retried {
        value: fallback(state),
        attempts: policy.max_attempts,
        outcome: RetryOutcome::Fallback,
    }
}
