//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod generate;

use std::path::Path;
use synth_report::{ReportKind, ReportProfile};

/// Load a profile file, or the built-in profile for `kind`, then apply
/// environment overrides.
pub fn load_profile(path: Option<&Path>, kind: ReportKind) -> crate::Result<ReportProfile> {
    let profile = match path {
        Some(path) => {
            if !path.exists() {
                return Err(crate::CliError::FileNotFound(path.display().to_string()));
            }
            ReportProfile::load(path)?
        }
        None => ReportProfile::builtin(kind)?,
    };
    Ok(profile.with_env_override())
}
