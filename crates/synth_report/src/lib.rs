//! # synth_report: Report Composition
//!
//! ## Layer 3 Role
//!
//! synth_report turns the samplers of `synth_sampling` into per-unit report
//! records:
//! - Label classification with an explicit "unclassified" outcome (`classifier`)
//! - Marker allocation by smallest row minimum (`allocation`)
//! - TOML report profiles with seasonal constants (`profile`)
//! - Section generation for illumination and radiation reports (`engine`)
//! - Parallel generation of independent sections (`parallel`)
//!
//! Rendering the records into documents is out of scope; records serialise
//! with `serde` for whatever layer consumes them.
//!
//! ## Usage Examples
//!
//! ```rust
//! use chrono::Month;
//! use synth_report::engine::{ReportEngine, Section, Unit};
//! use synth_report::parallel::generate_sections_parallel;
//! use synth_report::profile::ReportProfile;
//!
//! let engine = ReportEngine::new(ReportProfile::builtin_radiation().unwrap()).unwrap();
//! let sections = vec![
//!     Section::new("North", vec![Unit::new("Bedroom", 5)]),
//!     Section::new("South", vec![Unit::new("Office", 5), Unit::new("Hall", 3)]),
//! ];
//!
//! let reports = generate_sections_parallel(&engine, &sections, Month::June, 7).unwrap();
//! assert_eq!(reports.len(), 2);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod allocation;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod parallel;
pub mod profile;

pub use allocation::{allocate_markers, Marker, RowMinimum};
pub use classifier::{Classification, ClassificationRule, Classifier};
pub use engine::{Measurements, ReportEngine, Section, SectionReport, Unit, UnitRecord};
pub use error::ReportError;
pub use parallel::{generate_sections, generate_sections_parallel};
pub use profile::{ProfileError, ReportKind, ReportProfile};
