//! synth - Command Line Front End for Synthetic Measurement Reports
//!
//! # Commands
//!
//! - `synth generate --kind <illumination|radiation> --unit LABEL:POINTS ...` -
//!   Generate report records as JSON or CSV
//! - `synth check [--profile FILE]` - Load and validate a profile
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate wires the profile, the
//! report engine and the output formats together. Library crates never
//! install a subscriber; logging is initialised here.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use synth_report::ReportKind;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;

pub use error::{CliError, Result};

use commands::generate::{GenerateArgs, OutputFormat};

/// Synthetic measurement report generator
#[derive(Parser)]
#[command(name = "synth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug log filter)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Profile file path; the built-in profile is used when absent
    #[arg(short, long, global = true)]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Report kind as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Illumination,
    Radiation,
}

impl From<KindArg> for ReportKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Illumination => ReportKind::Illumination,
            KindArg::Radiation => ReportKind::Radiation,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate report records
    Generate {
        /// Report kind
        #[arg(short, long, value_enum)]
        kind: KindArg,

        /// Calendar month (1-12); defaults to the current month
        #[arg(short, long)]
        month: Option<u8>,

        /// Base seed; defaults to the profile seed, then to entropy
        #[arg(short, long)]
        seed: Option<u64>,

        /// Unit as LABEL:POINTS; repeat for several units
        #[arg(short, long = "unit")]
        units: Vec<String>,

        /// JSON file holding an array of sections
        #[arg(long)]
        sections: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Load and validate a profile
    Check {
        /// Report kind of the built-in profile to check
        #[arg(short, long, value_enum, default_value = "illumination")]
        kind: KindArg,
    },
}

impl Commands {
    fn kind(&self) -> ReportKind {
        match self {
            Commands::Generate { kind, .. } | Commands::Check { kind } => (*kind).into(),
        }
    }
}

fn init_tracing(verbose: bool, profile_level: Option<&str>) {
    let level = if verbose {
        "debug"
    } else {
        profile_level.unwrap_or("info")
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let kind = cli.command.kind();

    // Profile errors surface after tracing is up
    let loaded = commands::load_profile(cli.profile.as_deref(), kind);
    init_tracing(
        cli.verbose,
        loaded.as_ref().ok().map(|profile| profile.log_level.as_str()),
    );
    let profile = loaded.with_context(|| format!("failed to load {} profile", kind))?;

    if cli.verbose {
        debug!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Generate {
            month,
            seed,
            units,
            sections,
            format,
            ..
        } => {
            let args = GenerateArgs {
                kind,
                month,
                seed,
                units: &units,
                sections: sections.as_deref(),
                format,
            };
            let stdout = std::io::stdout();
            commands::generate::run(&args, profile, &mut stdout.lock())
                .with_context(|| format!("failed to generate {} report", kind))
        }
        Commands::Check { .. } => commands::check::run(&profile)
            .with_context(|| format!("{} profile check failed", kind)),
    }
}
