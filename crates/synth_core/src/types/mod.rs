//! Value objects consumed and produced by the samplers.
//!
//! This module provides:
//! - `range`: Closed numeric bounds with clamping and anchor windows
//! - `distribution`: Weighted categorical outcomes and triangular parameters
//! - `request`: Per-invocation requests and results (walk requests, ratio bands,
//!   sample batches, carried-over anchors)
//! - `error`: Structured error type shared by every layer
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level.

pub mod distribution;
pub mod error;
pub mod range;
pub mod request;

pub use distribution::{CategoricalDistribution, TriangularSpec, WeightedOutcome};
pub use error::SynthError;
pub use range::Range;
pub use request::{AnchorState, RatioConstraint, SampleBatch, SeriesRequest};
