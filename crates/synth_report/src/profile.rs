//! Report profile management.
//!
//! A profile holds every per-report-type constant the generators need:
//! seasonal ranges, ratio bands, step caps, weighted mean targets, uncertainty
//! coefficients and classification rules. Profiles are loaded from TOML files
//! with environment variable overrides, or taken from the built-in defaults.
//!
//! ```toml
//! kind = "illumination"
//! log_level = "info"
//!
//! [illumination]
//! step_cap = 200.0
//! quantum = 10.0
//!
//! [[illumination.seasons]]
//! name = "winter"
//! months = [11, 12, 1, 2, 3]
//! outdoor = { min = 5000.0, max = 7000.0 }
//! ratio = { ratio_min = 0.0488, ratio_max = 0.0555 }
//! ```

use crate::classifier::ClassificationRule;
use chrono::Month;
use serde::{Deserialize, Serialize};
use std::path::Path;
use synth_core::types::{CategoricalDistribution, Range, RatioConstraint, TriangularSpec};
use thiserror::Error;

/// Environment variable overriding the base seed.
pub const ENV_SEED: &str = "SYNTH_SEED";

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "SYNTH_LOG_LEVEL";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Profile error type
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProfileError {
    /// IO error reading the profile file
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error in the profile file
    #[error("Parse error: {0}")]
    Parse(String),
    /// One or more validation failures
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Which report a profile drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Outdoor/indoor illuminance with daylight ratio
    Illumination,
    /// Gamma dose rate batches
    Radiation,
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Illumination => write!(f, "illumination"),
            Self::Radiation => write!(f, "radiation"),
        }
    }
}

/// Constants valid for a set of calendar months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonProfile {
    /// Season name
    pub name: String,
    /// Calendar months (1 = January)
    pub months: Vec<u32>,
    /// Outdoor illuminance range
    pub outdoor: Range,
    /// Default indoor/outdoor ratio band
    pub ratio: RatioConstraint,
}

/// Month-to-season lookup.
#[derive(Debug, Clone)]
pub struct SeasonTable<'a> {
    seasons: &'a [SeasonProfile],
}

impl<'a> SeasonTable<'a> {
    /// Wrap a list of seasons.
    pub fn new(seasons: &'a [SeasonProfile]) -> Self {
        Self { seasons }
    }

    /// First season listing `month`.
    pub fn season_for(&self, month: Month) -> Option<&'a SeasonProfile> {
        let number = month.number_from_month();
        self.seasons.iter().find(|s| s.months.contains(&number))
    }

    /// Problems with month coverage: out-of-range numbers, months covered
    /// twice, months not covered at all.
    pub fn coverage_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut owner: [Option<&str>; 12] = [None; 12];
        for season in self.seasons {
            for &m in &season.months {
                if !(1..=12).contains(&m) {
                    errors.push(format!("season '{}' lists invalid month {}", season.name, m));
                    continue;
                }
                let index = (m - 1) as usize;
                if let Some(first) = owner[index] {
                    errors.push(format!(
                        "month {} listed by both '{}' and '{}'",
                        m, first, season.name
                    ));
                } else {
                    owner[index] = Some(season.name.as_str());
                }
            }
        }
        let missing: Vec<String> = owner
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_none())
            .map(|(i, _)| (i + 1).to_string())
            .collect();
        if !missing.is_empty() {
            errors.push(format!("months without a season: {}", missing.join(", ")));
        }
        errors
    }
}

/// Room category with its own ratio band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioClass {
    /// Category name
    pub name: String,
    /// Label substrings selecting this category
    pub patterns: Vec<String>,
    /// Ratio band replacing the season band
    pub ratio: RatioConstraint,
}

/// Room category with a permissible level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitClass {
    /// Category name
    pub name: String,
    /// Label substrings selecting this category
    pub patterns: Vec<String>,
    /// Permissible level reported alongside the measurements
    pub limit: f64,
}

/// Illumination report constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IlluminationProfile {
    /// Seasonal outdoor ranges and default ratio bands
    pub seasons: Vec<SeasonProfile>,

    /// Largest change between neighbouring outdoor points
    #[serde(default = "default_step_cap")]
    pub step_cap: f64,

    /// Outdoor quantization unit
    #[serde(default = "default_quantum")]
    pub quantum: f64,

    /// Window around the previous unit's last value for the first point
    #[serde(default = "default_anchor_tolerance")]
    pub anchor_tolerance: f64,

    /// Required spacing between neighbouring ratios (plain, not percent)
    #[serde(default = "default_min_ratio_difference")]
    pub min_ratio_difference: f64,

    /// Add sub-unit digits to indoor values
    #[serde(default = "default_true")]
    pub fractional_noise: bool,

    /// Relative uncertainty coefficient of the lux meter
    #[serde(default = "default_lux_coefficient")]
    pub uncertainty_coefficient: f64,

    /// Decimal places of the reported ratio and uncertainties
    #[serde(default = "default_decimals")]
    pub decimals: u32,

    /// Category-specific ratio bands, in priority order
    #[serde(default)]
    pub classes: Vec<RatioClass>,
}

/// Radiation report constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiationProfile {
    /// Distribution of individual readings
    pub distribution: TriangularSpec,

    /// Weighted candidate means per unit
    pub targets: CategoricalDistribution<f64>,

    /// Accepted deviation of a unit's mean from its target
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Rejection budget per unit
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Decimal places of each reading
    #[serde(default = "default_decimals")]
    pub decimals: u32,

    /// Coverage factor of the expanded uncertainty
    #[serde(default = "default_coverage")]
    pub coverage: f64,

    /// Relative uncertainty coefficient of the dosimeter
    #[serde(default = "default_dose_coefficient")]
    pub uncertainty_coefficient: f64,

    /// Category-specific permissible levels, in priority order
    #[serde(default)]
    pub classes: Vec<LimitClass>,
}

/// Report profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProfile {
    /// Report type
    pub kind: ReportKind,

    /// Base seed; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Constants for illumination reports
    #[serde(default)]
    pub illumination: Option<IlluminationProfile>,

    /// Constants for radiation reports
    #[serde(default)]
    pub radiation: Option<RadiationProfile>,
}

fn default_step_cap() -> f64 {
    200.0
}

fn default_quantum() -> f64 {
    10.0
}

fn default_anchor_tolerance() -> f64 {
    100.0
}

fn default_min_ratio_difference() -> f64 {
    0.0005
}

fn default_true() -> bool {
    true
}

fn default_lux_coefficient() -> f64 {
    0.08
}

fn default_decimals() -> u32 {
    2
}

fn default_tolerance() -> f64 {
    0.003
}

fn default_max_attempts() -> usize {
    synth_sampling::retry::DEFAULT_MAX_ATTEMPTS
}

fn default_coverage() -> f64 {
    synth_core::math::derived::DEFAULT_COVERAGE
}

fn default_dose_coefficient() -> f64 {
    0.3
}

fn default_log_level() -> String {
    "info".to_string()
}

const BUILTIN_ILLUMINATION: &str = include_str!("../profiles/illumination.toml");
const BUILTIN_RADIATION: &str = include_str!("../profiles/radiation.toml");

impl ReportProfile {
    /// Built-in illumination profile with a cold and a warm season.
    pub fn builtin_illumination() -> Result<Self, ProfileError> {
        Self::from_toml(BUILTIN_ILLUMINATION)
    }

    /// Built-in radiation profile for gamma dose rate (uSv/h).
    pub fn builtin_radiation() -> Result<Self, ProfileError> {
        Self::from_toml(BUILTIN_RADIATION)
    }

    /// Built-in profile for a report kind.
    pub fn builtin(kind: ReportKind) -> Result<Self, ProfileError> {
        match kind {
            ReportKind::Illumination => Self::builtin_illumination(),
            ReportKind::Radiation => Self::builtin_radiation(),
        }
    }

    /// Load a profile from a TOML file
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path).map_err(|e| ProfileError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse a profile from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ProfileError> {
        toml::from_str(content).map_err(|e| ProfileError::Parse(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn with_env_override(mut self) -> Self {
        if let Ok(seed) = std::env::var(ENV_SEED) {
            if let Ok(seed) = seed.trim().parse() {
                self.seed = Some(seed);
            }
        }

        if let Ok(log_level) = std::env::var(ENV_LOG_LEVEL) {
            self.log_level = log_level;
        }

        self
    }

    /// Validate the profile, collecting every problem.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        match (self.kind, &self.illumination, &self.radiation) {
            (ReportKind::Illumination, None, _) => {
                errors.push("illumination profile requires an [illumination] table".to_string())
            }
            (ReportKind::Radiation, _, None) => {
                errors.push("radiation profile requires a [radiation] table".to_string())
            }
            _ => {}
        }

        if let Some(illumination) = &self.illumination {
            validate_illumination(illumination, &mut errors);
        }
        if let Some(radiation) = &self.radiation {
            validate_radiation(radiation, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProfileError::Validation(errors))
        }
    }

    /// Load a profile from file, apply environment overrides and validate
    pub fn load_with_env_and_validate(path: &Path) -> Result<Self, ProfileError> {
        let profile = Self::load(path)?.with_env_override();
        profile.validate()?;
        Ok(profile)
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn validate_patterns(owner: &str, patterns: &[String], errors: &mut Vec<String>) {
    if patterns.is_empty() {
        errors.push(format!("class '{}' has no patterns", owner));
    }
    if patterns.iter().any(|p| p.trim().is_empty()) {
        errors.push(format!("class '{}' has an empty pattern", owner));
    }
}

fn validate_band(owner: &str, band: &RatioConstraint, errors: &mut Vec<String>) {
    if let Err(e) = RatioConstraint::new(band.ratio_min, band.ratio_max) {
        errors.push(format!("'{}' ratio band: {}", owner, e));
    }
}

fn validate_illumination(profile: &IlluminationProfile, errors: &mut Vec<String>) {
    if profile.seasons.is_empty() {
        errors.push("illumination.seasons cannot be empty".to_string());
    } else {
        errors.extend(SeasonTable::new(&profile.seasons).coverage_errors());
    }
    for season in &profile.seasons {
        validate_band(&season.name, &season.ratio, errors);
        if season.outdoor.min() <= 0.0 {
            errors.push(format!(
                "season '{}' outdoor range must be positive, got min {}",
                season.name,
                season.outdoor.min()
            ));
        }
    }
    if !positive(profile.step_cap) {
        errors.push(format!("step_cap must be positive, got {}", profile.step_cap));
    }
    if !positive(profile.quantum) {
        errors.push(format!("quantum must be positive, got {}", profile.quantum));
    }
    if !(profile.anchor_tolerance.is_finite() && profile.anchor_tolerance >= 0.0) {
        errors.push(format!(
            "anchor_tolerance must be non-negative, got {}",
            profile.anchor_tolerance
        ));
    }
    if !(profile.min_ratio_difference.is_finite() && profile.min_ratio_difference >= 0.0) {
        errors.push(format!(
            "min_ratio_difference must be non-negative, got {}",
            profile.min_ratio_difference
        ));
    }
    if !(profile.uncertainty_coefficient.is_finite() && profile.uncertainty_coefficient >= 0.0) {
        errors.push(format!(
            "uncertainty_coefficient must be non-negative, got {}",
            profile.uncertainty_coefficient
        ));
    }
    for class in &profile.classes {
        validate_patterns(&class.name, &class.patterns, errors);
        validate_band(&class.name, &class.ratio, errors);
    }
}

fn validate_radiation(profile: &RadiationProfile, errors: &mut Vec<String>) {
    if !(profile.tolerance.is_finite() && profile.tolerance >= 0.0) {
        errors.push(format!("tolerance must be non-negative, got {}", profile.tolerance));
    }
    if !positive(profile.coverage) {
        errors.push(format!("coverage must be positive, got {}", profile.coverage));
    }
    if !(profile.uncertainty_coefficient.is_finite() && profile.uncertainty_coefficient >= 0.0) {
        errors.push(format!(
            "uncertainty_coefficient must be non-negative, got {}",
            profile.uncertainty_coefficient
        ));
    }
    let support = profile.distribution.range();
    for outcome in profile.targets.outcomes() {
        if !support.contains(outcome.value) {
            errors.push(format!(
                "target mean {} outside distribution support [{}, {}]",
                outcome.value,
                support.min(),
                support.max()
            ));
        }
    }
    for class in &profile.classes {
        validate_patterns(&class.name, &class.patterns, errors);
        if !positive(class.limit) {
            errors.push(format!("class '{}' limit must be positive", class.name));
        }
    }
}

/// Classification rules mapping labels to class indices.
pub(crate) fn ratio_rules(classes: &[RatioClass]) -> Vec<ClassificationRule<usize>> {
    classes
        .iter()
        .enumerate()
        .map(|(i, c)| ClassificationRule::new(c.patterns.iter().cloned(), i))
        .collect()
}

/// Classification rules mapping labels to class indices.
pub(crate) fn limit_rules(classes: &[LimitClass]) -> Vec<ClassificationRule<usize>> {
    classes
        .iter()
        .enumerate()
        .map(|(i, c)| ClassificationRule::new(c.patterns.iter().cloned(), i))
        .collect()
}
