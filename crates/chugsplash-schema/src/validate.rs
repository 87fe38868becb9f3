//! # Config Validation
//!
//! Walks untyped input (a `serde_json::Value`, typically parsed from a JSON
//! or YAML file) against the config schema and narrows it to a typed
//! [`ChugSplashConfig`].
//!
//! ## Trust Boundary
//!
//! Validation runs before any compilation or publishing. Every violation is
//! collected, not just the first, and each one carries the field path, a
//! reason code and a message so the author can fix the whole file in one
//! pass. The input is never mutated.
//!
//! ## Check Order
//!
//! 1. Top level has `options` and `contracts`.
//! 2. `options.name` and `options.owner` are non-empty strings.
//! 3. `contracts` is a mapping; every key is non-empty.
//! 4. Every contract has a non-empty string `source`.
//! 5. `variables`, when present, hold valid config variables within the
//!    depth cap.
//! 6. `address`, when present, matches the configured address format.
//!
//! Unknown fields are ignored, so a canonical config also validates as a
//! raw config.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use chugsplash_core::{
    CanonicalChugSplashConfig, ChugSplashConfig, CompilerSource, ConfigOptions, ConfigVariable,
    ContractConfig, SourceLanguage,
};

use crate::document::DocumentFormat;
use crate::options::ValidationOptions;
use crate::path::FieldPath;

/// Why a value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationReason {
    /// A required field is absent.
    MissingField,
    /// A value has the wrong JSON type.
    WrongType,
    /// A string that must be non-empty is empty.
    EmptyString,
    /// A config variable is nested deeper than the configured cap.
    DepthExceeded,
    /// A mapping key appears more than once in the document text.
    DuplicateKey,
    /// An `address` does not match the configured format.
    InvalidAddress,
    /// A number has a fractional part or does not fit in 64 bits.
    NonIntegerNumber,
    /// A canonical source declares a language outside the supported set.
    UnsupportedLanguage,
    /// A canonical config's `sources` length disagrees with its contracts.
    SourceCountMismatch,
}

impl ViolationReason {
    /// Stable reason code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "MissingField",
            Self::WrongType => "WrongType",
            Self::EmptyString => "EmptyString",
            Self::DepthExceeded => "DepthExceeded",
            Self::DuplicateKey => "DuplicateKey",
            Self::InvalidAddress => "InvalidAddress",
            Self::NonIntegerNumber => "NonIntegerNumber",
            Self::UnsupportedLanguage => "UnsupportedLanguage",
            Self::SourceCountMismatch => "SourceCountMismatch",
        }
    }
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Location of the violating value.
    pub path: FieldPath,
    /// Reason code.
    pub reason: ViolationReason,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Create a violation.
    pub fn new(path: FieldPath, reason: ViolationReason, message: impl Into<String>) -> Self {
        Self {
            path,
            reason,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "  (root): {} [{}]", self.message, self.reason)
        } else {
            write!(f, "  {}: {} [{}]", self.path, self.message, self.reason)
        }
    }
}

/// Collection of validation violations, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns the first violation, if any.
    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    /// Returns the first violation at `path` (rendered form) with `reason`.
    pub fn find(&self, path: &str, reason: ViolationReason) -> Option<&Violation> {
        self.violations
            .iter()
            .find(|v| v.reason == reason && v.path.to_string() == path)
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }

    pub(crate) fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub(crate) fn extend(&mut self, other: ValidationViolations) {
        self.violations.extend(other.violations);
    }
}

impl From<Vec<Violation>> for ValidationViolations {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Error returned by the validator.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The document did not conform to the config schema.
    #[error("config validation failed with {} violation(s):\n{violations}", .violations.len())]
    Invalid {
        /// Every violation found.
        violations: ValidationViolations,
    },

    /// The document text could not be parsed at all.
    #[error("could not parse {format} document: {reason}")]
    Parse {
        /// Format the text was parsed as.
        format: DocumentFormat,
        /// Parser message.
        reason: String,
    },
}

impl ValidationError {
    /// The violations, if this is a schema failure.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::Invalid { violations } => Some(violations),
            Self::Parse { .. } => None,
        }
    }
}

/// Validates raw and canonical configs.
///
/// `Validator` holds only its options and is `Send + Sync`; one instance
/// can validate any number of documents.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidationOptions,
}

impl Validator {
    /// Create a validator with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with explicit options.
    pub fn with_options(options: ValidationOptions) -> Self {
        Self { options }
    }

    /// The options in effect.
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate a raw config.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Invalid` listing every violation found.
    pub fn validate(&self, raw: &Value) -> Result<ChugSplashConfig, ValidationError> {
        let mut walk = Walk::new(&self.options);
        let config = walk.config(raw);
        walk.finish(config)
    }

    /// Validate a canonical config: the embedded raw config plus `sources`.
    ///
    /// `sources` must hold one entry per distinct contract source, each with
    /// a supported `language`, a non-empty `version` and an `input` holding
    /// no fractional numbers.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Invalid` listing every violation found.
    pub fn validate_canonical(
        &self,
        raw: &Value,
    ) -> Result<CanonicalChugSplashConfig, ValidationError> {
        let mut walk = Walk::new(&self.options);
        let config = walk.config(raw);
        let sources = raw
            .as_object()
            .and_then(|root| walk.sources(root, &FieldPath::root()));

        let canonical = match (config, sources) {
            (Some(config), Some(sources)) => {
                let expected = config.distinct_sources().len();
                if sources.len() != expected {
                    walk.violation(
                        FieldPath::root().key("sources"),
                        ViolationReason::SourceCountMismatch,
                        format!(
                            "expected {expected} source(s), one per distinct contract source, found {}",
                            sources.len()
                        ),
                    );
                    None
                } else {
                    Some(CanonicalChugSplashConfig { config, sources })
                }
            }
            _ => None,
        };
        walk.finish(canonical)
    }
}

/// Validate a raw config with default options.
///
/// # Errors
///
/// Returns `ValidationError::Invalid` listing every violation found.
pub fn validate(raw: &Value) -> Result<ChugSplashConfig, ValidationError> {
    Validator::new().validate(raw)
}

/// Validate a canonical config with default options.
///
/// # Errors
///
/// Returns `ValidationError::Invalid` listing every violation found.
pub fn validate_canonical(raw: &Value) -> Result<CanonicalChugSplashConfig, ValidationError> {
    Validator::new().validate_canonical(raw)
}

/// Name of a JSON value's type, for messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One validation pass. Each method returns `None` when the value is
/// invalid, and in that case has recorded at least one violation.
struct Walk<'a> {
    options: &'a ValidationOptions,
    violations: ValidationViolations,
}

impl<'a> Walk<'a> {
    fn new(options: &'a ValidationOptions) -> Self {
        Self {
            options,
            violations: ValidationViolations::default(),
        }
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, ValidationError> {
        match value {
            Some(value) if self.violations.is_empty() => Ok(value),
            _ => Err(ValidationError::Invalid {
                violations: self.violations,
            }),
        }
    }

    fn violation(&mut self, path: FieldPath, reason: ViolationReason, message: impl Into<String>) {
        self.violations.push(Violation::new(path, reason, message));
    }

    fn wrong_type(&mut self, path: FieldPath, expected: &str, found: &Value) {
        self.violation(
            path,
            ViolationReason::WrongType,
            format!("expected {expected}, found {}", type_name(found)),
        );
    }

    /// Look up a required field.
    fn required<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        field: &str,
        path: &FieldPath,
    ) -> Option<&'v Value> {
        let value = object.get(field);
        if value.is_none() {
            self.violation(
                path.key(field),
                ViolationReason::MissingField,
                format!("missing required field `{field}`"),
            );
        }
        value
    }

    /// Look up an optional field. `null` is treated as absent.
    fn optional<'v>(object: &'v Map<String, Value>, field: &str) -> Option<&'v Value> {
        object.get(field).filter(|v| !v.is_null())
    }

    fn object<'v>(&mut self, value: &'v Value, path: &FieldPath) -> Option<&'v Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.wrong_type(path.clone(), "object", value);
        }
        object
    }

    fn non_empty_string(&mut self, value: &Value, path: &FieldPath) -> Option<String> {
        match value {
            Value::String(s) if s.is_empty() => {
                self.violation(path.clone(), ViolationReason::EmptyString, "must not be empty");
                None
            }
            Value::String(s) => Some(s.clone()),
            other => {
                self.wrong_type(path.clone(), "string", other);
                None
            }
        }
    }

    fn required_string(
        &mut self,
        object: &Map<String, Value>,
        field: &str,
        path: &FieldPath,
    ) -> Option<String> {
        let value = self.required(object, field, path)?;
        self.non_empty_string(value, &path.key(field))
    }

    fn config(&mut self, raw: &Value) -> Option<ChugSplashConfig> {
        let root_path = FieldPath::root();
        let root = self.object(raw, &root_path)?;

        let options = self
            .required(root, "options", &root_path)
            .and_then(|v| self.options_field(v, &root_path.key("options")));
        let contracts = self
            .required(root, "contracts", &root_path)
            .and_then(|v| self.contracts(v, &root_path.key("contracts")));

        Some(ChugSplashConfig {
            options: options?,
            contracts: contracts?,
        })
    }

    fn options_field(&mut self, value: &Value, path: &FieldPath) -> Option<ConfigOptions> {
        let object = self.object(value, path)?;
        let name = self.required_string(object, "name", path);
        let owner = self.required_string(object, "owner", path);
        Some(ConfigOptions {
            name: name?,
            owner: owner?,
        })
    }

    fn contracts(
        &mut self,
        value: &Value,
        path: &FieldPath,
    ) -> Option<BTreeMap<String, ContractConfig>> {
        let object = self.object(value, path)?;
        let mut contracts = BTreeMap::new();
        let mut ok = true;
        for (name, entry) in object {
            let entry_path = path.key(name);
            if name.is_empty() {
                self.violation(
                    entry_path.clone(),
                    ViolationReason::EmptyString,
                    "contract name must not be empty",
                );
                ok = false;
            }
            match self.contract(entry, &entry_path) {
                Some(contract) => {
                    contracts.insert(name.clone(), contract);
                }
                None => ok = false,
            }
        }
        ok.then_some(contracts)
    }

    fn contract(&mut self, value: &Value, path: &FieldPath) -> Option<ContractConfig> {
        let object = self.object(value, path)?;

        let source = self.required_string(object, "source", path);

        let variables = match Self::optional(object, "variables") {
            None => Some(None),
            Some(v) => self.variables(v, &path.key("variables")).map(Some),
        };

        let address = match Self::optional(object, "address") {
            None => Some(None),
            Some(v) => self.address(v, &path.key("address")).map(Some),
        };

        Some(ContractConfig {
            source: source?,
            address: address?,
            variables: variables?,
        })
    }

    fn address(&mut self, value: &Value, path: &FieldPath) -> Option<String> {
        let address = self.non_empty_string(value, path)?;
        if self.options.address_format.matches(&address) {
            Some(address)
        } else {
            let expected = self.options.address_format.describe();
            self.violation(
                path.clone(),
                ViolationReason::InvalidAddress,
                format!("{address:?} is not a valid address (expected {expected})"),
            );
            None
        }
    }

    fn variables(
        &mut self,
        value: &Value,
        path: &FieldPath,
    ) -> Option<BTreeMap<String, ConfigVariable>> {
        let object = self.object(value, path)?;
        let mut variables = BTreeMap::new();
        let mut ok = true;
        for (name, value) in object {
            let var_path = path.key(name);
            if name.is_empty() {
                self.violation(
                    var_path.clone(),
                    ViolationReason::EmptyString,
                    "variable name must not be empty",
                );
                ok = false;
            }
            match self.variable(value, &var_path, 0) {
                Some(v) => {
                    variables.insert(name.clone(), v);
                }
                None => ok = false,
            }
        }
        ok.then_some(variables)
    }

    /// Validate one config variable at nesting `depth`.
    ///
    /// Stops descending at the first value past the cap, so adversarial
    /// nesting costs at most `max_depth` stack frames.
    fn variable(&mut self, value: &Value, path: &FieldPath, depth: usize) -> Option<ConfigVariable> {
        if depth > self.options.max_depth {
            self.violation(
                path.clone(),
                ViolationReason::DepthExceeded,
                format!(
                    "variable nesting exceeds the maximum depth of {}",
                    self.options.max_depth
                ),
            );
            return None;
        }

        match value {
            Value::Bool(b) => Some(ConfigVariable::Bool(*b)),
            Value::String(s) => Some(ConfigVariable::String(s.clone())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(ConfigVariable::Number(n.clone())),
            Value::Number(n) => {
                self.violation(
                    path.clone(),
                    ViolationReason::NonIntegerNumber,
                    format!("{n} is not a 64-bit integer; write large or fractional values as strings"),
                );
                None
            }
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                let mut ok = true;
                for (i, item) in items.iter().enumerate() {
                    match self.variable(item, &path.index(i), depth + 1) {
                        Some(v) => out.push(v),
                        None => ok = false,
                    }
                }
                ok.then_some(ConfigVariable::Array(out))
            }
            Value::Object(map) => {
                let mut out = BTreeMap::new();
                let mut ok = true;
                for (key, item) in map {
                    match self.variable(item, &path.key(key), depth + 1) {
                        Some(v) => {
                            out.insert(key.clone(), v);
                        }
                        None => ok = false,
                    }
                }
                ok.then_some(ConfigVariable::Object(out))
            }
            Value::Null => {
                self.wrong_type(path.clone(), "bool, number, string, array or object", value);
                None
            }
        }
    }

    fn sources(
        &mut self,
        root: &Map<String, Value>,
        root_path: &FieldPath,
    ) -> Option<Vec<CompilerSource>> {
        let path = root_path.key("sources");
        let value = self.required(root, "sources", root_path)?;
        let Some(items) = value.as_array() else {
            self.wrong_type(path, "array", value);
            return None;
        };

        let mut sources = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            match self.source(item, &path.index(i)) {
                Some(source) => sources.push(source),
                None => ok = false,
            }
        }
        ok.then_some(sources)
    }

    fn source(&mut self, value: &Value, path: &FieldPath) -> Option<CompilerSource> {
        let object = self.object(value, path)?;

        let language = self
            .required_string(object, "language", path)
            .and_then(|raw| match SourceLanguage::parse(&raw) {
                Some(language) => Some(language),
                None => {
                    self.violation(
                        path.key("language"),
                        ViolationReason::UnsupportedLanguage,
                        format!("unsupported source language {raw:?}"),
                    );
                    None
                }
            });
        let version = self.required_string(object, "version", path);
        let input = match self.required(object, "input", path) {
            Some(Value::Null) => {
                self.wrong_type(path.key("input"), "compiler input", &Value::Null);
                None
            }
            Some(input) => self
                .integer_input(input, &path.key("input"))
                .then(|| input.clone()),
            None => None,
        };

        Some(CompilerSource {
            language: language?,
            version: version?,
            input: input?,
        })
    }

    /// Report every fractional number inside a compiler input. Canonical
    /// bytes carry integers only.
    fn integer_input(&mut self, value: &Value, path: &FieldPath) -> bool {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => true,
            Value::Number(n) => {
                self.violation(
                    path.clone(),
                    ViolationReason::NonIntegerNumber,
                    format!("compiler input contains non-integer number {n}"),
                );
                false
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .fold(true, |ok, (i, item)| self.integer_input(item, &path.index(i)) && ok),
            Value::Object(map) => map
                .iter()
                .fold(true, |ok, (k, v)| self.integer_input(v, &path.key(k)) && ok),
            Value::Null | Value::Bool(_) | Value::String(_) => true,
        }
    }
}
