//! Integration tests for end-to-end report generation.
//!
//! Load a profile from disk, generate several sections and check the
//! invariants a rendering layer relies on.

use chrono::Month;
use synth_core::math::rounding::format_fixed;
use synth_core::types::AnchorState;
use synth_report::{
    generate_sections_parallel, Marker, Measurements, ProfileError, ReportEngine, ReportError,
    ReportKind, ReportProfile, Section, Unit,
};
use synth_sampling::rng::SynthRng;

const CUSTOM_PROFILE: &str = r#"
kind = "illumination"

[illumination]
step_cap = 100.0
quantum = 10.0
anchor_tolerance = 50.0
min_ratio_difference = 0.0

[[illumination.seasons]]
name = "year"
months = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]
outdoor = { min = 6000.0, max = 6000.0 }
ratio = { ratio_min = 0.0488, ratio_max = 0.0555 }
"#;

fn building() -> Vec<Section> {
    vec![
        Section::new(
            "Section 1",
            vec![Unit::new("Office 1", 2), Unit::new("Office 2", 3)],
        ),
        Section::new(
            "Section 2",
            vec![Unit::new("Classroom", 4), Unit::new("Laboratory", 2)],
        ),
    ]
}

#[test]
fn test_profile_from_file_drives_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, CUSTOM_PROFILE).unwrap();

    let profile = ReportProfile::load(&path).unwrap();
    let engine = ReportEngine::new(profile).unwrap();
    let reports = generate_sections_parallel(&engine, &building(), Month::April, 11).unwrap();

    for report in &reports {
        for record in &report.records {
            // Unclassified in this profile: season band applies
            assert_eq!(record.category, None);
            if let Measurements::Illumination { points, .. } = &record.measurements {
                for point in points {
                    // Degenerate outdoor range and the scenario band
                    assert_eq!(point.outdoor, 6000.0);
                    assert!(point.indoor >= 293.0 && point.indoor <= 333.0, "{}", point.indoor);
                }
            }
        }
    }
}

#[test]
fn test_invalid_file_reports_all_problems() {
    let broken = CUSTOM_PROFILE
        .replace("step_cap = 100.0", "step_cap = -1.0")
        .replace("quantum = 10.0", "quantum = 0.0");
    let profile = ReportProfile::from_toml(&broken).unwrap();
    match ReportEngine::new(profile) {
        Err(ReportError::Profile(ProfileError::Validation(errors))) => {
            assert!(errors.iter().any(|e| e.contains("step_cap")));
            assert!(errors.iter().any(|e| e.contains("quantum")));
        }
        other => panic!("Expected validation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_sections_chain_through_terminal_anchor() {
    let profile = ReportProfile::builtin(ReportKind::Illumination).unwrap();
    let engine = ReportEngine::new(profile).unwrap();
    let mut rng = SynthRng::from_seed(21);
    let mut anchor = AnchorState::empty();

    for section in building() {
        let report = engine
            .generate_section(&section, Month::December, anchor, &mut rng)
            .unwrap();
        if let (Some(previous), Measurements::Illumination { points, .. }) =
            (anchor.value(), &report.records[0].measurements)
        {
            assert!((points[0].outdoor - previous).abs() <= 105.0);
        }
        anchor = report
            .terminal_anchor
            .map_or(anchor, AnchorState::from_value);
    }
    assert!(anchor.value().is_some());
}

#[test]
fn test_every_section_has_one_special_unit() {
    let engine = ReportEngine::new(ReportProfile::builtin(ReportKind::Radiation).unwrap()).unwrap();
    let reports = generate_sections_parallel(&engine, &building(), Month::January, 99).unwrap();
    for report in reports {
        let specials = report
            .records
            .iter()
            .filter(|r| r.marker == Marker::Special)
            .count();
        assert_eq!(specials, 1, "section {}", report.name);
    }
}

#[test]
fn test_values_render_with_fixed_decimals() {
    let engine = ReportEngine::new(ReportProfile::builtin_radiation().unwrap()).unwrap();
    let reports = generate_sections_parallel(&engine, &building(), Month::January, 5).unwrap();
    for record in reports.iter().flat_map(|r| &r.records) {
        if let Measurements::Radiation { points, .. } = &record.measurements {
            for point in points {
                let text = format_fixed(point.value, 2);
                assert_eq!(text.len(), 4, "{}", text);
                assert!(text.starts_with("0."));
            }
        }
    }
}
