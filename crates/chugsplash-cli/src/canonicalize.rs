//! # Canonicalize Subcommand
//!
//! Validates a config, attaches compiler outputs, and writes the canonical
//! config as JCS bytes plus a trailing newline. With `--check`, compares
//! against the existing file instead of writing it.
//!
//! The compiler outputs file is a JSON (or YAML) mapping from source name to
//! `{language, version, input}`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use sha2::{Digest, Sha256};

use chugsplash_canonical::{canonicalize, CompileOutputs};
use chugsplash_core::sha256_digest;
use chugsplash_schema::{parse_document, validate_document, ValidationError, Validator};

use crate::settings::PipelineSettings;

/// Arguments for the `chugsplash canonicalize` subcommand.
#[derive(Args, Debug)]
pub struct CanonicalizeArgs {
    /// Raw config file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Compiler outputs keyed by source name.
    #[arg(long, value_name = "FILE")]
    pub outputs: PathBuf,

    /// Output path. Defaults to `<config stem>.canonical.json` next to the config.
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Verify the existing canonical file matches instead of writing it.
    #[arg(long)]
    pub check: bool,
}

/// Execute the canonicalize subcommand.
///
/// Returns exit code: 0 on success, 1 on invalid input or a failed check.
pub fn run_canonicalize(args: &CanonicalizeArgs, settings: &PipelineSettings) -> Result<u8> {
    let validator = Validator::with_options(settings.validation_options()?);
    let (text, format) = crate::read_document(&args.config)?;

    let config = match validate_document(&validator, &text, format) {
        Ok(config) => config,
        Err(e) => {
            crate::report_invalid(&args.config, &e);
            return Ok(1);
        }
    };

    let outputs = match load_outputs(&args.outputs)? {
        Ok(outputs) => outputs,
        Err(e) => {
            crate::report_invalid(&args.outputs, &e);
            return Ok(1);
        }
    };
    tracing::info!(
        contracts = config.contracts.len(),
        outputs = outputs.len(),
        "canonicalizing config"
    );

    let canonical = match canonicalize(&config, &outputs) {
        Ok(canonical) => canonical,
        Err(e) => {
            println!("FAIL: {e}");
            return Ok(1);
        }
    };

    let bytes = canonical
        .canonical_bytes()
        .context("failed to serialize canonical config")?;
    let digest = sha256_digest(&bytes);
    let out_path = args
        .out
        .clone()
        .unwrap_or_else(|| default_out_path(&args.config));

    if args.check {
        if !out_path.exists() {
            println!("FAIL: canonical config does not exist: {}", out_path.display());
            return Ok(1);
        }

        let existing = std::fs::read(&out_path)
            .with_context(|| format!("failed to read {}", out_path.display()))?;

        // Allow trailing newline.
        let expected = bytes.as_bytes();
        let matches =
            existing == expected || existing == [expected, b"\n".as_slice()].concat();

        if matches {
            println!("OK: canonical config is up to date ({digest})");
            Ok(0)
        } else {
            println!("FAIL: canonical config is outdated or differs from computed config");
            println!("  Expected digest: {digest}");
            println!("  Existing digest: sha256:{}", sha256_of_bytes(&existing));
            Ok(1)
        }
    } else {
        let output = [bytes.as_bytes(), b"\n".as_slice()].concat();
        std::fs::write(&out_path, &output)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        println!("OK: wrote canonical config to {}", out_path.display());
        println!("  digest: {digest}");
        Ok(0)
    }
}

/// Parse a compiler outputs file.
///
/// The outer error is operational (unreadable file, wrong shape). A document
/// with duplicate keys comes back as the inner `ValidationError` so it can be
/// reported like an invalid config.
fn load_outputs(path: &Path) -> Result<Result<CompileOutputs, ValidationError>> {
    let (text, format) = crate::read_document(path)?;
    let value = match parse_document(&text, format) {
        Ok(value) => value,
        Err(e @ ValidationError::Invalid { .. }) => return Ok(Err(e)),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to parse compiler outputs: {}", path.display()))
        }
    };
    let outputs: CompileOutputs = serde_json::from_value(value)
        .with_context(|| format!("failed to parse compiler outputs: {}", path.display()))?;
    Ok(Ok(outputs))
}

/// `dir/name.yaml` becomes `dir/name.canonical.json`.
fn default_out_path(config: &Path) -> PathBuf {
    config.with_extension("canonical.json")
}

/// SHA-256 hex digest of raw, possibly non-canonical, bytes.
fn sha256_of_bytes(bytes: &[u8]) -> String {
    let result = Sha256::digest(bytes);
    result.iter().map(|b| format!("{b:02x}")).collect()
}
