//! # Strict Document Parsing
//!
//! Turns JSON or YAML text into the untyped value the validator walks.
//!
//! `serde_json::Value` silently keeps the last of two identical keys, which
//! would let `contracts: {Foo: ..., Foo: ...}` drop a contract without a
//! trace. Parsing here goes through a path-tracking `DeserializeSeed` that
//! records every repeated key as a `DuplicateKey` violation instead.
//!
//! YAML scalars map onto their JSON counterparts; non-string mapping keys
//! (integers, booleans) are stringified. Tagged YAML values are rejected.

use std::cell::RefCell;
use std::fmt;
use std::path::Path;

use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};

use chugsplash_core::{CanonicalChugSplashConfig, ChugSplashConfig};

use crate::path::FieldPath;
use crate::validate::{
    ValidationError, ValidationViolations, Validator, Violation, ViolationReason,
};

/// Text format of a config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// JSON.
    Json,
    /// YAML 1.2 (a superset of JSON).
    Yaml,
}

impl DocumentFormat {
    /// Pick a format from a file extension: `.yaml`/`.yml` are YAML,
    /// everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    /// Returns the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse document text into an untyped value.
///
/// # Errors
///
/// Returns `ValidationError::Parse` for malformed text and
/// `ValidationError::Invalid` with one `DuplicateKey` violation per repeated
/// mapping key.
pub fn parse_document(text: &str, format: DocumentFormat) -> Result<Value, ValidationError> {
    let (value, duplicates) = parse_lenient(text, format)?;
    if duplicates.is_empty() {
        Ok(value)
    } else {
        Err(ValidationError::Invalid {
            violations: duplicates,
        })
    }
}

/// Parse and validate a raw config document.
///
/// Duplicate keys and schema violations are reported together.
///
/// # Errors
///
/// Returns `ValidationError::Parse` for malformed text, otherwise
/// `ValidationError::Invalid` with every violation found.
pub fn validate_document(
    validator: &Validator,
    text: &str,
    format: DocumentFormat,
) -> Result<ChugSplashConfig, ValidationError> {
    let (value, duplicates) = parse_lenient(text, format)?;
    merge(duplicates, validator.validate(&value))
}

/// Parse and validate a canonical config document.
///
/// # Errors
///
/// Returns `ValidationError::Parse` for malformed text, otherwise
/// `ValidationError::Invalid` with every violation found.
pub fn validate_canonical_document(
    validator: &Validator,
    text: &str,
    format: DocumentFormat,
) -> Result<CanonicalChugSplashConfig, ValidationError> {
    let (value, duplicates) = parse_lenient(text, format)?;
    merge(duplicates, validator.validate_canonical(&value))
}

fn merge<T>(
    mut duplicates: ValidationViolations,
    result: Result<T, ValidationError>,
) -> Result<T, ValidationError> {
    match result {
        Ok(value) if duplicates.is_empty() => Ok(value),
        Ok(_) => Err(ValidationError::Invalid {
            violations: duplicates,
        }),
        Err(ValidationError::Invalid { violations }) => {
            duplicates.extend(violations);
            Err(ValidationError::Invalid {
                violations: duplicates,
            })
        }
        Err(other) => Err(other),
    }
}

fn parse_lenient(
    text: &str,
    format: DocumentFormat,
) -> Result<(Value, ValidationViolations), ValidationError> {
    let duplicates = RefCell::new(Vec::new());
    let seed = ValueSeed {
        path: FieldPath::root(),
        duplicates: &duplicates,
    };

    let parsed = match format {
        DocumentFormat::Json => {
            let mut de = serde_json::Deserializer::from_str(text);
            seed.deserialize(&mut de)
                .and_then(|value| de.end().map(|()| value))
                .map_err(|e| e.to_string())
        }
        DocumentFormat::Yaml => seed
            .deserialize(serde_yaml::Deserializer::from_str(text))
            .map_err(|e| e.to_string()),
    };

    let value = parsed.map_err(|reason| ValidationError::Parse { format, reason })?;
    let violations = duplicates
        .into_inner()
        .into_iter()
        .map(|path: FieldPath| {
            let key = match path.segments().last() {
                Some(crate::path::PathSegment::Key(k)) => k.clone(),
                _ => String::new(),
            };
            Violation::new(
                path,
                ViolationReason::DuplicateKey,
                format!("key {key:?} appears more than once"),
            )
        })
        .collect::<Vec<_>>();
    Ok((value, violations.into()))
}

/// Deserializes any value while tracking where it sits in the document.
struct ValueSeed<'d> {
    path: FieldPath,
    duplicates: &'d RefCell<Vec<FieldPath>>,
}

impl<'de, 'd> DeserializeSeed<'de> for ValueSeed<'d> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de, 'd> Visitor<'de> for ValueSeed<'d> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON-compatible value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Number::from_f64(v)
            .map(Value::Number)
            .ok_or_else(|| E::custom(format!("{v} at {} is not a finite number", self.path)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element_seed(ValueSeed {
            path: self.path.index(items.len()),
            duplicates: self.duplicates,
        })? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut object = Map::new();
        while let Some(key) = map.next_key_seed(KeySeed)? {
            let child = self.path.key(&key);
            let value = map.next_value_seed(ValueSeed {
                path: child.clone(),
                duplicates: self.duplicates,
            })?;
            if object.contains_key(&key) {
                self.duplicates.borrow_mut().push(child);
            }
            object.insert(key, value);
        }
        Ok(Value::Object(object))
    }
}

/// Mapping keys: strings, or YAML scalars stringified.
struct KeySeed;

impl<'de> DeserializeSeed<'de> for KeySeed {
    type Value = String;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for KeySeed {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, integer or boolean mapping key")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_duplicate_contract_is_reported() {
        let text = r#"{
            "options": {"name": "A", "owner": "0x1"},
            "contracts": {
                "Foo": {"source": "Foo.sol"},
                "Foo": {"source": "Other.sol"}
            }
        }"#;
        let err = parse_document(text, DocumentFormat::Json).unwrap_err();
        let v = err.violations().unwrap();
        assert_eq!(v.len(), 1);
        assert!(v.find("contracts.Foo", ViolationReason::DuplicateKey).is_some());
    }

    #[test]
    fn nested_duplicate_paths_include_indexes() {
        let text = r#"{"contracts": {"Foo": {"variables": {"v": [{"a": 1, "a": 2}]}}}}"#;
        let err = parse_document(text, DocumentFormat::Json).unwrap_err();
        assert!(err
            .violations()
            .unwrap()
            .find("contracts.Foo.variables.v[0].a", ViolationReason::DuplicateKey)
            .is_some());
    }

    #[test]
    fn json_without_duplicates_parses() {
        let value = parse_document(r#"{"a": [1, -2, "x", null, true]}"#, DocumentFormat::Json)
            .unwrap();
        assert_eq!(value, serde_json::json!({"a": [1, -2, "x", null, true]}));
    }

    #[test]
    fn trailing_garbage_is_a_parse_error() {
        let err = parse_document(r#"{"a": 1} x"#, DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, ValidationError::Parse { format: DocumentFormat::Json, .. }));
    }

    #[test]
    fn yaml_parses_to_json_values() {
        let text = r#"
options:
  name: A
  owner: "0x1"
contracts:
  Foo:
    source: Foo.sol
    variables:
      x: 1
      y: [true, s]
      1: numeric-key
"#;
        let value = parse_document(text, DocumentFormat::Yaml).unwrap();
        assert_eq!(value["options"]["owner"], "0x1");
        assert_eq!(value["contracts"]["Foo"]["variables"]["x"], 1);
        assert_eq!(value["contracts"]["Foo"]["variables"]["y"][1], "s");
        assert_eq!(value["contracts"]["Foo"]["variables"]["1"], "numeric-key");
    }

    #[test]
    fn yaml_duplicate_keys_are_rejected() {
        let text = "options:\n  name: A\n  name: B\n";
        let err = parse_document(text, DocumentFormat::Yaml).unwrap_err();
        assert!(err
            .violations()
            .unwrap()
            .find("options.name", ViolationReason::DuplicateKey)
            .is_some());
    }

    #[test]
    fn validate_document_reports_duplicates_and_schema_errors_together() {
        let text = r#"{
            "options": {"name": "A"},
            "contracts": {"Foo": {"source": "Foo.sol"}, "Foo": {"source": "Foo.sol"}}
        }"#;
        let err = validate_document(&Validator::new(), text, DocumentFormat::Json).unwrap_err();
        let v = err.violations().unwrap();
        assert!(v.find("contracts.Foo", ViolationReason::DuplicateKey).is_some());
        assert!(v.find("options.owner", ViolationReason::MissingField).is_some());
    }

    #[test]
    fn validate_document_accepts_the_example() {
        let text = r#"{"options":{"name":"A","owner":"0x1"},
            "contracts":{"Foo":{"source":"Foo.sol","variables":{"x":1,"y":[true,"s"]}}}}"#;
        let config = validate_document(&Validator::new(), text, DocumentFormat::Json).unwrap();
        assert_eq!(config.distinct_sources(), vec!["Foo.sol"]);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a/chugsplash.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("b.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("c.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("noext")), DocumentFormat::Json);
    }
}
