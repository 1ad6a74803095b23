//! # synth_core: Foundation Types for Synthetic Measurement Generation
//!
//! ## Layer 1 (Foundation) Role
//!
//! synth_core is the bottom layer of the workspace and provides:
//! - Value objects: [`Range`](types::Range), [`TriangularSpec`](types::TriangularSpec),
//!   [`CategoricalDistribution`](types::CategoricalDistribution),
//!   [`SeriesRequest`](types::SeriesRequest), [`RatioConstraint`](types::RatioConstraint),
//!   [`SampleBatch`](types::SampleBatch), [`AnchorState`](types::AnchorState) (`types`)
//! - Error type: [`SynthError`](types::SynthError) (`types::error`)
//! - Half-up rounding and quantization (`math::rounding`)
//! - Derived-quantity formulas: uncertainties and ratios (`math::derived`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other synth_* crates and holds no
//! randomness. Everything here is a pure function or an immutable value:
//! - num-traits: generic floating-point formulas
//! - thiserror: error derives
//! - serde: configuration deserialisation (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use synth_core::math::derived::{proportional_uncertainty, ratio_percent};
//! use synth_core::math::rounding::round_half_up;
//! use synth_core::types::Range;
//!
//! let range = Range::new(5000.0, 7000.0).unwrap();
//! assert_eq!(range.clamp(7200.0), 7000.0);
//!
//! let keo = ratio_percent(300.0, 6000.0).unwrap();
//! assert_eq!(round_half_up(keo, 2), 5.0);
//!
//! let u = proportional_uncertainty(0.135_f64, 0.3);
//! assert!(u > 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for the value types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
