//! Pipeline settings.
//!
//! Loaded from an optional settings file, then overridden by environment
//! variables:
//!
//! - `CHUGSPLASH_MAX_DEPTH` (default: 64)
//! - `CHUGSPLASH_ADDRESS_PATTERN` (default: unset, meaning `0x` + 40 hex)

use std::path::Path;

use serde::Deserialize;

use chugsplash_schema::{AddressFormat, DocumentFormat, ValidationOptions, DEFAULT_MAX_DEPTH};

/// Environment variable overriding `max_depth`.
pub const MAX_DEPTH_VAR: &str = "CHUGSPLASH_MAX_DEPTH";
/// Environment variable overriding `address_pattern`.
pub const ADDRESS_PATTERN_VAR: &str = "CHUGSPLASH_ADDRESS_PATTERN";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSettings {
    /// Deepest allowed variable nesting.
    pub max_depth: usize,
    /// Regex every contract address must match in full.
    pub address_pattern: Option<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            address_pattern: None,
        }
    }
}

/// Settings errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {reason}")]
    Parse { path: String, reason: String },
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidDepth { var: &'static str, value: String },
    #[error("invalid address pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl PipelineSettings {
    /// Load settings from `path` (if any) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        base.with_overrides(|var| std::env::var(var).ok())
    }

    /// Parse a YAML or JSON settings file, chosen by extension.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let parsed = match DocumentFormat::from_path(path) {
            DocumentFormat::Json => serde_json::from_str(&text).map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yaml::from_str(&text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| SettingsError::Parse {
            path: path.display().to_string(),
            reason,
        })
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        if let Some(raw) = lookup(MAX_DEPTH_VAR) {
            self.max_depth = raw
                .trim()
                .parse()
                .map_err(|_| SettingsError::InvalidDepth {
                    var: MAX_DEPTH_VAR,
                    value: raw.clone(),
                })?;
        }
        if let Some(pattern) = lookup(ADDRESS_PATTERN_VAR) {
            self.address_pattern = Some(pattern);
        }
        Ok(self)
    }

    /// Validator options for these settings.
    pub fn validation_options(&self) -> Result<ValidationOptions, SettingsError> {
        let address_format = match &self.address_pattern {
            Some(pattern) => {
                AddressFormat::pattern(pattern).map_err(|e| SettingsError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?
            }
            None => AddressFormat::Evm,
        };
        Ok(ValidationOptions::default()
            .with_max_depth(self.max_depth)
            .with_address_format(address_format))
    }
}
