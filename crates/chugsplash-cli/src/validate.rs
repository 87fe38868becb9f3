//! # Validate Subcommand
//!
//! Checks a raw (or, with `--canonical`, a canonical) config document and
//! prints either an `OK` summary of what each contract entry will do or a
//! `FAIL` report listing every violation.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use chugsplash_core::ChugSplashConfig;
use chugsplash_schema::{validate_canonical_document, validate_document, Validator};

use crate::settings::PipelineSettings;

/// Arguments for the `chugsplash validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Config file (JSON, or YAML by `.yaml`/`.yml` extension).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Validate as a canonical config, including `sources`.
    #[arg(long)]
    pub canonical: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 if valid, 1 if not.
pub fn run_validate(args: &ValidateArgs, settings: &PipelineSettings) -> Result<u8> {
    let validator = Validator::with_options(settings.validation_options()?);
    let (text, format) = crate::read_document(&args.config)?;

    tracing::info!(
        path = %args.config.display(),
        %format,
        canonical = args.canonical,
        "validating config"
    );

    let result = if args.canonical {
        validate_canonical_document(&validator, &text, format).map(|c| {
            let sources = c.sources.len();
            (c.config, Some(sources))
        })
    } else {
        validate_document(&validator, &text, format).map(|c| (c, None))
    };

    match result {
        Ok((config, sources)) => {
            print_summary(&args.config, &config, sources);
            Ok(0)
        }
        Err(e) => {
            crate::report_invalid(&args.config, &e);
            Ok(1)
        }
    }
}

fn print_summary(path: &Path, config: &ChugSplashConfig, sources: Option<usize>) {
    println!(
        "OK: {} ({}, owner {})",
        path.display(),
        config.options.name,
        config.options.owner
    );
    for (name, contract) in &config.contracts {
        println!("  {name}: {} ({})", contract.deployment(), contract.source);
    }
    match sources {
        Some(n) => println!("{} contract(s), {n} source(s)", config.contracts.len()),
        None => println!("{} contract(s)", config.contracts.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn args(config: PathBuf) -> ValidateArgs {
        ValidateArgs {
            config,
            canonical: false,
        }
    }

    const VALID_YAML: &str = "\
options:
  name: MyProject
  owner: '0x1'
contracts:
  Token:
    source: Token.sol
    variables:
      supply: 100
";

    #[test]
    fn valid_yaml_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "chugsplash.yaml", VALID_YAML);
        let code = run_validate(&args(path), &PipelineSettings::default()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn invalid_config_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.json", r#"{"options": {"name": ""}, "contracts": {}}"#);
        let code = run_validate(&args(path), &PipelineSettings::default()).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn unparseable_config_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "broken.json", "{not json");
        let code = run_validate(&args(path), &PipelineSettings::default()).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn depth_setting_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "deep.yaml",
            "options: {name: A, owner: '0x1'}\ncontracts:\n  C:\n    source: C.sol\n    variables:\n      v: [[1]]\n",
        );
        let shallow = PipelineSettings {
            max_depth: 1,
            ..PipelineSettings::default()
        };
        assert_eq!(run_validate(&args(path.clone()), &shallow).unwrap(), 1);
        assert_eq!(run_validate(&args(path), &PipelineSettings::default()).unwrap(), 0);
    }

    #[test]
    fn raw_config_fails_canonical_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "chugsplash.yaml", VALID_YAML);
        let canonical = ValidateArgs {
            config: path,
            canonical: true,
        };
        assert_eq!(run_validate(&canonical, &PipelineSettings::default()).unwrap(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = run_validate(
            &args(PathBuf::from("/nonexistent/chugsplash.yaml")),
            &PipelineSettings::default(),
        );
        assert!(result.is_err());
    }
}
