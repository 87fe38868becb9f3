//! # chugsplash CLI entry point
//!
//! Parses command-line arguments, loads pipeline settings, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chugsplash_cli::canonicalize::{run_canonicalize, CanonicalizeArgs};
use chugsplash_cli::digest::{run_digest, DigestArgs};
use chugsplash_cli::settings::PipelineSettings;
use chugsplash_cli::validate::{run_validate, ValidateArgs};

/// ChugSplash config tooling.
///
/// Validates deployment configs, attaches compiler outputs to produce the
/// canonical config, and computes its content digest.
#[derive(Parser, Debug)]
#[command(name = "chugsplash", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a settings file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a raw or canonical config.
    Validate(ValidateArgs),

    /// Attach compiler outputs and write or verify the canonical config.
    Canonicalize(CanonicalizeArgs),

    /// Print the content digest of a canonical config.
    Digest(DigestArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = match PipelineSettings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(2);
        }
    };

    tracing::debug!(?settings, "loaded settings");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &settings),
        Commands::Canonicalize(args) => run_canonicalize(&args, &settings),
        Commands::Digest(args) => run_digest(&args, &settings),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
