//! # Digest Subcommand
//!
//! Validates a canonical config and prints its `sha256:` content digest on
//! stdout. The digest is computed over the re-canonicalized document, so a
//! pretty-printed file yields the same digest as its canonical form.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use chugsplash_schema::{validate_canonical_document, Validator};

use crate::settings::PipelineSettings;

/// Arguments for the `chugsplash digest` subcommand.
#[derive(Args, Debug)]
pub struct DigestArgs {
    /// Canonical config file.
    #[arg(value_name = "CANONICAL")]
    pub canonical: PathBuf,
}

/// Execute the digest subcommand.
///
/// Returns exit code: 0 on success, 1 if the document is not a valid
/// canonical config.
pub fn run_digest(args: &DigestArgs, settings: &PipelineSettings) -> Result<u8> {
    let validator = Validator::with_options(settings.validation_options()?);
    let (text, format) = crate::read_document(&args.canonical)?;

    let canonical = match validate_canonical_document(&validator, &text, format) {
        Ok(canonical) => canonical,
        Err(e) => {
            crate::report_invalid(&args.canonical, &e);
            return Ok(1);
        }
    };

    let bytes = canonical
        .canonical_bytes()
        .context("failed to serialize canonical config")?;
    if text.trim_end_matches('\n').as_bytes() != bytes.as_bytes() {
        tracing::warn!(
            path = %args.canonical.display(),
            "file is not in canonical form; digest covers the canonical re-encoding"
        );
    }

    println!("{}", chugsplash_core::sha256_digest(&bytes));
    Ok(0)
}
