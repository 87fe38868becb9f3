//! # chugsplash-cli: ChugSplash Config Tooling
//!
//! Provides the `chugsplash` command-line interface over the validator and
//! canonicalizer.
//!
//! ## Subcommands
//!
//! - `chugsplash validate`: Validate a raw or canonical config.
//! - `chugsplash canonicalize`: Attach compiler outputs and write (or
//!   `--check`) the canonical config.
//! - `chugsplash digest`: Print the content digest of a canonical config.
//!
//! ```bash
//! chugsplash validate chugsplash.yaml
//! chugsplash canonicalize chugsplash.yaml --outputs compiled.json --check
//! chugsplash digest chugsplash.canonical.json
//! ```
//!
//! ## Exit Codes
//!
//! Handlers return `0` on success and `1` when the input is invalid or a
//! check fails. Operational errors propagate as `anyhow::Error` and the
//! binary exits with `2`.

pub mod canonicalize;
pub mod digest;
pub mod settings;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use chugsplash_schema::{DocumentFormat, ValidationError};

/// Read a config document, picking its format from the extension.
pub fn read_document(path: &Path) -> Result<(String, DocumentFormat)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok((text, DocumentFormat::from_path(path)))
}

/// Print a `FAIL` report for a document that did not validate.
pub fn report_invalid(path: &Path, err: &ValidationError) {
    println!("FAIL: {}", path.display());
    match err.violations() {
        Some(violations) => {
            for violation in violations.violations() {
                println!("{violation}");
            }
            println!(
                "\n{} violation(s) in {}.",
                violations.len(),
                path.display()
            );
        }
        None => println!("  {err}"),
    }
}
