//! Error types for report generation.

use crate::profile::{ProfileError, ReportKind};
use chrono::Month;
use synth_core::types::SynthError;
use thiserror::Error;

/// Report error type
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid sampler input or a zero divisor in a derived quantity
    #[error("Sampling error: {0}")]
    Synth(#[from] SynthError),

    /// Profile could not be loaded or failed validation
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// No season lists the requested month
    #[error("No season configured for {0:?}")]
    NoSeason(Month),

    /// Profile lacks the table for the report kind
    #[error("Profile has no [{0}] table")]
    MissingTable(ReportKind),
}
