//! Generate command implementation
//!
//! Builds sections from `--unit LABEL:POINTS` arguments or a JSON sections
//! file, generates them in parallel and prints the records as JSON or CSV.

use std::io::Write;
use std::path::Path;

use chrono::{Datelike, Month};
use serde::Serialize;
use synth_core::math::rounding::format_fixed;
use synth_report::{
    generate_sections_parallel, Marker, Measurements, ReportEngine, ReportKind, ReportProfile,
    Section, SectionReport, Unit,
};
use synth_sampling::rng::SynthRng;
use tracing::info;

use crate::{CliError, Result};

/// Section name used for units given on the command line.
const DEFAULT_SECTION: &str = "main";

/// Output format of the generate command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array of section reports
    Json,
    /// One row per measurement point
    Csv,
}

/// Arguments of the generate command.
#[derive(Debug, Clone)]
pub struct GenerateArgs<'a> {
    /// Report kind
    pub kind: ReportKind,
    /// Calendar month 1-12; current month when absent
    pub month: Option<u8>,
    /// Base seed; profile seed or entropy when absent
    pub seed: Option<u64>,
    /// `LABEL:POINTS` unit specifications
    pub units: &'a [String],
    /// JSON file with an array of sections
    pub sections: Option<&'a Path>,
    /// Output format
    pub format: OutputFormat,
}

/// Parse `LABEL:POINTS`; the label may itself contain colons.
pub fn parse_unit(spec: &str) -> Result<Unit> {
    let invalid = |reason: &str| CliError::invalid_argument(format!("unit '{}' {}", spec, reason));
    let (label, points) = spec
        .rsplit_once(':')
        .ok_or_else(|| invalid("must be LABEL:POINTS"))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(invalid("has an empty label"));
    }
    let points: usize = points
        .trim()
        .parse()
        .map_err(|_| invalid("has invalid point count"))?;
    if points == 0 {
        return Err(invalid("needs at least one point"));
    }
    Ok(Unit::new(label, points))
}

/// Resolve the month argument, defaulting to the current month.
pub fn resolve_month(month: Option<u8>) -> Result<Month> {
    let number = match month {
        Some(m) => m,
        None => chrono::Local::now().month() as u8,
    };
    Month::try_from(number)
        .map_err(|_| CliError::invalid_argument(format!("month must be 1-12, got {}", number)))
}

fn load_sections(args: &GenerateArgs<'_>) -> Result<Vec<Section>> {
    if let Some(path) = args.sections {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&content)?);
    }
    if args.units.is_empty() {
        return Err(CliError::invalid_argument(
            "at least one --unit or a --sections file is required",
        ));
    }
    let units = args
        .units
        .iter()
        .map(|spec| parse_unit(spec))
        .collect::<Result<Vec<_>>>()?;
    Ok(vec![Section::new(DEFAULT_SECTION, units)])
}

/// Run the generate command with a loaded profile, writing to `out`.
pub fn run<W: Write>(
    args: &GenerateArgs<'_>,
    mut profile: ReportProfile,
    out: &mut W,
) -> Result<()> {
    if profile.kind != args.kind {
        return Err(CliError::invalid_argument(format!(
            "profile is for {} reports, requested {}",
            profile.kind, args.kind
        )));
    }
    let seed = args
        .seed
        .or(profile.seed)
        .unwrap_or_else(|| SynthRng::from_entropy().seed());
    profile.seed = Some(seed);

    let month = resolve_month(args.month)?;
    let sections = load_sections(args)?;
    let engine = ReportEngine::new(profile)?;

    info!(kind = %args.kind, ?month, seed, sections = sections.len(), "generating report");
    let reports = generate_sections_parallel(&engine, &sections, month, seed)?;

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &reports)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(&reports, out)?,
    }
    Ok(())
}

/// One CSV row per measurement point.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    section: &'a str,
    label: &'a str,
    category: &'a str,
    marker: &'a str,
    point: usize,
    primary: String,
    secondary: String,
    ratio_percent: String,
    uncertainty: String,
    limit: String,
}

fn write_csv<W: Write>(reports: &[SectionReport], out: &mut W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for report in reports {
        for record in &report.records {
            let marker = match record.marker {
                Marker::Special => "special",
                Marker::Neutral => "",
            };
            let category = record.category.as_deref().unwrap_or("");
            let limit = record.limit.map(|l| format_fixed(l, 2)).unwrap_or_default();
            match &record.measurements {
                Measurements::Illumination { points, .. } => {
                    for (index, p) in points.iter().enumerate() {
                        writer.serialize(CsvRow {
                            section: &report.name,
                            label: &record.label,
                            category,
                            marker,
                            point: index + 1,
                            primary: format_fixed(p.outdoor, 0),
                            secondary: format_fixed(p.indoor, 2),
                            ratio_percent: format_fixed(p.ratio_percent, 2),
                            uncertainty: format_fixed(p.ratio_uncertainty, 2),
                            limit: limit.clone(),
                        })?;
                    }
                }
                Measurements::Radiation { points, .. } => {
                    for (index, p) in points.iter().enumerate() {
                        writer.serialize(CsvRow {
                            section: &report.name,
                            label: &record.label,
                            category,
                            marker,
                            point: index + 1,
                            primary: format_fixed(p.value, 2),
                            secondary: String::new(),
                            ratio_percent: String::new(),
                            uncertainty: format_fixed(p.uncertainty, 2),
                            limit: limit.clone(),
                        })?;
                    }
                }
            }
        }
    }
    writer.flush()?;
    Ok(())
}
