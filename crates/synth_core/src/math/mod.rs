//! Pure numeric helpers.
//!
//! ## Available Modules
//!
//! - [`rounding`]: Half-up rounding, quantization to a grid, fixed-decimal formatting
//! - [`derived`]: Uncertainty and ratio formulas evaluated over sampled values
//!
//! Nothing in this module draws random numbers or holds state.

pub mod derived;
pub mod rounding;
