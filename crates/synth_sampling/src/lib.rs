//! # synth_sampling: Constrained Samplers
//!
//! ## Layer 2 Role
//!
//! synth_sampling builds on the value types of `synth_core` and adds
//! everything that consumes randomness:
//! - Request-scoped generator: [`SynthRng`](rng::SynthRng) (`rng`)
//! - Bounded retry with deterministic fallback (`retry`)
//! - Weighted categorical and triangular draws (`distributions`)
//! - Mean-targeted batches (`series`)
//! - Bounded random walks with anchoring (`walk`)
//! - Ratio-constrained dependent values (`ratio`)
//!
//! Every sampler terminates: rejection loops are capped by a
//! [`RetryPolicy`](retry::RetryPolicy) and exhaustion yields a computed
//! fallback, never an error. Errors are reserved for invalid inputs.
//!
//! ## Usage Examples
//!
//! ```rust
//! use synth_core::types::{Range, RatioConstraint, SeriesRequest};
//! use synth_sampling::ratio::{sample_dependent, RatioRequest};
//! use synth_sampling::rng::SynthRng;
//! use synth_sampling::walk::generate_walk;
//!
//! let mut rng = SynthRng::from_seed(2024);
//!
//! // Outdoor illuminance for four measurement points
//! let outdoor = Range::new(5000.0, 7000.0).unwrap();
//! let walk = generate_walk(&SeriesRequest::new(4, outdoor, 200.0).with_quantum(10.0), &mut rng)
//!     .unwrap();
//!
//! // Indoor illuminance constrained to 4.88%..5.55% of the outdoor value
//! let band = RatioConstraint::new(0.0488, 0.0555).unwrap();
//! let indoor = sample_dependent(&RatioRequest::new(walk.values[0], band), &mut rng).unwrap();
//! assert!(indoor.range.contains(indoor.integer));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialisation for walk and ratio results

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod distributions;
pub mod ratio;
pub mod retry;
pub mod rng;
pub mod series;
pub mod walk;

pub use distributions::{sample_categorical, sample_triangular, Triangular};
pub use ratio::{sample_dependent, DependentRange, RatioRequest, RatioSample, Selection};
pub use retry::{retry_with_fallback, RetryOutcome, RetryPolicy, Retried};
pub use rng::SynthRng;
pub use series::{sample_mean_targeted, MeanTarget};
pub use walk::{generate_walk, WalkSequence};
