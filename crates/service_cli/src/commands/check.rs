//! Check command implementation
//!
//! Loads a profile and reports every validation problem at once.

use synth_report::ReportProfile;
use tracing::info;

use crate::Result;

/// Run the check command on a loaded profile
pub fn run(profile: &ReportProfile) -> Result<()> {
    profile.validate()?;

    info!(kind = %profile.kind, "profile is valid");
    if let Some(illumination) = &profile.illumination {
        for season in &illumination.seasons {
            info!(
                season = %season.name,
                months = ?season.months,
                outdoor_min = season.outdoor.min(),
                outdoor_max = season.outdoor.max(),
                "season"
            );
        }
        info!(classes = illumination.classes.len(), "illumination classes");
    }
    if let Some(radiation) = &profile.radiation {
        info!(
            targets = radiation.targets.len(),
            classes = radiation.classes.len(),
            "radiation targets"
        );
    }
    println!("OK: {} profile is valid", profile.kind);
    Ok(())
}
