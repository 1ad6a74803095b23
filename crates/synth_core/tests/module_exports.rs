//! Integration tests for module exports.
//!
//! Verify that all public modules and types are correctly exported and
//! accessible via absolute paths.

/// Test that value types are accessible via absolute path.
#[test]
fn test_types_module_exports() {
    use synth_core::types::distribution::{CategoricalDistribution, TriangularSpec};
    use synth_core::types::range::Range;
    use synth_core::types::request::{AnchorState, RatioConstraint, SampleBatch, SeriesRequest};
    use synth_core::types::WeightedOutcome;

    let range = Range::new(0.0, 10.0).unwrap();
    let _ = SeriesRequest::new(3, range, 1.0);
    let _ = RatioConstraint::new(0.04, 0.06).unwrap();
    let _ = SampleBatch::new(vec![1.0], 1, false);
    let _ = AnchorState::empty();
    let _ = TriangularSpec::new(0.0, 1.0, 0.5).unwrap();
    let _ = CategoricalDistribution::new(vec![WeightedOutcome::new((), 1.0)]).unwrap();
}

/// Test that the error type is accessible and implements std::error::Error.
#[test]
fn test_error_exports() {
    use synth_core::types::error::SynthError;

    let err: Box<dyn std::error::Error> = Box::new(SynthError::DivisionByZero { context: "ratio" });
    assert!(err.to_string().contains("ratio"));
}

/// Test that math helpers are accessible via absolute path.
#[test]
fn test_math_module_exports() {
    use synth_core::math::derived::{
        combined_uncertainty, expanded_uncertainty, proportional_uncertainty, ratio,
        ratio_percent, ratio_uncertainty, DEFAULT_COVERAGE,
    };
    use synth_core::math::rounding::{format_fixed, grid_decimals, quantize, round_half_up};

    let _ = proportional_uncertainty(1.0_f64, 0.1);
    let _ = expanded_uncertainty(1.0_f64, DEFAULT_COVERAGE);
    let _ = ratio(1.0_f64, 2.0);
    let _ = ratio_percent(1.0_f64, 2.0);
    let _ = combined_uncertainty(1.0_f64, 2.0);
    let _ = ratio_uncertainty(50.0_f64, 1.0, 0.1, 2.0, 0.1);
    let _ = round_half_up(1.25, 1);
    let _ = quantize(12.0, 5.0);
    let _ = grid_decimals(0.25);
    let _ = format_fixed(1.0, 2);
}

/// The documented illumination scenario: 300 lx indoors against 6000 lx
/// outdoors is a 5.00 % ratio.
#[test]
fn test_illumination_ratio_formatting() {
    use synth_core::math::derived::ratio_percent;
    use synth_core::math::rounding::format_fixed;

    let keo = ratio_percent(300.0, 6000.0).unwrap();
    assert_eq!(format_fixed(keo, 2), "5.00");
}
