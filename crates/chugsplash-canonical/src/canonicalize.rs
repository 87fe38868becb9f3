//! # Canonicalization
//!
//! Attaches compilation details to a validated config, producing the
//! canonical config that gets published.
//!
//! ## Determinism
//!
//! The canonical config exists so that anyone can re-derive a deployment's
//! bytecode from what was published. Given the same config and compiler
//! outputs the result must be byte-identical, so:
//!
//! - sources are deduplicated (two contracts may share one source);
//! - `sources` is ordered by source name, never by map iteration or
//!   compile completion order;
//! - every map in the model is a `BTreeMap`, and bytes are produced through
//!   `CanonicalBytes` (JCS).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use chugsplash_core::{CanonicalChugSplashConfig, ChugSplashConfig, CompilerSource, SourceLanguage};

use crate::error::CanonicalizationError;

/// What the compiler layer produced for one source.
///
/// `language` is kept as the raw string the compiler layer reported so that
/// an unsupported language surfaces as a `CanonicalizationError` rather than
/// a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerOutput {
    /// Source language, e.g. `solidity`.
    pub language: String,
    /// Compiler version, e.g. `0.8.0`.
    pub version: String,
    /// Compiler input payload.
    pub input: serde_json::Value,
}

impl CompilerOutput {
    /// Output for a Solidity source.
    pub fn solidity(version: impl Into<String>, input: serde_json::Value) -> Self {
        Self {
            language: SourceLanguage::Solidity.as_str().to_string(),
            version: version.into(),
            input,
        }
    }
}

/// Compiler outputs keyed by source name.
pub type CompileOutputs = BTreeMap<String, CompilerOutput>;

/// Attach compiler outputs to `config`.
///
/// Outputs for sources that no contract references are ignored.
///
/// # Errors
///
/// - `MissingCompilation` for the first (by name) source with no output.
/// - `UnsupportedLanguage` if an output's language is not supported.
/// - `NonIntegerInput` if an output's input holds a fractional number.
pub fn canonicalize(
    config: &ChugSplashConfig,
    outputs: &CompileOutputs,
) -> Result<CanonicalChugSplashConfig, CanonicalizationError> {
    let names = config.distinct_sources();
    let mut sources = Vec::with_capacity(names.len());

    for name in &names {
        let output = outputs
            .get(*name)
            .ok_or_else(|| CanonicalizationError::MissingCompilation {
                source_name: name.to_string(),
            })?;

        let language = SourceLanguage::parse(&output.language).ok_or_else(|| {
            CanonicalizationError::UnsupportedLanguage {
                source_name: name.to_string(),
                language: output.language.clone(),
            }
        })?;

        if let Some(n) = first_non_integer(&output.input) {
            return Err(CanonicalizationError::NonIntegerInput {
                source_name: name.to_string(),
                value: n.to_string(),
            });
        }

        tracing::debug!(
            source = %name,
            %language,
            version = %output.version,
            "attached compiler output"
        );

        sources.push(CompilerSource {
            language,
            version: output.version.clone(),
            input: output.input.clone(),
        });
    }

    for unused in outputs.keys().filter(|k| !names.contains(&k.as_str())) {
        tracing::debug!(source = %unused, "ignoring output for unreferenced source");
    }

    Ok(CanonicalChugSplashConfig {
        config: config.clone(),
        sources,
    })
}

/// First fractional number in `value`, depth-first.
fn first_non_integer(value: &serde_json::Value) -> Option<&serde_json::Number> {
    use serde_json::Value;

    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => None,
        Value::Number(n) => Some(n),
        Value::Array(items) => items.iter().find_map(first_non_integer),
        Value::Object(map) => map.values().find_map(first_non_integer),
        Value::Null | Value::Bool(_) | Value::String(_) => None,
    }
}
