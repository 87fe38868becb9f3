//! # Config Pipeline Tests
//!
//! Drives a config through validation, canonicalization and re-validation
//! across the `chugsplash-schema`, `chugsplash-canonical` and
//! `chugsplash-core` crates.

use std::sync::Arc;

use chugsplash_canonical::{
    canonicalize, compile_and_canonicalize, CanonicalizationError, CompileOutputs, CompilerOutput,
};
use chugsplash_core::{sha256_digest, CanonicalBytes, ConfigVariable, SourceLanguage};
use chugsplash_schema::{validate, validate_canonical, ViolationReason};
use serde_json::json;

fn example_config() -> serde_json::Value {
    json!({
        "options": {"name": "A", "owner": "0x1"},
        "contracts": {
            "Foo": {
                "source": "Foo.sol",
                "variables": {"x": 1, "y": [true, "s"]}
            }
        }
    })
}

fn example_outputs() -> CompileOutputs {
    let mut outputs = CompileOutputs::new();
    outputs.insert(
        "Foo.sol".to_string(),
        CompilerOutput::solidity("0.8.0", json!([{"content": "contract Foo {}"}])),
    );
    outputs
}

// ---------------------------------------------------------------------------
// 1. Worked example
// ---------------------------------------------------------------------------

#[test]
fn example_validates_and_canonicalizes_to_one_source() {
    let config = validate(&example_config()).unwrap();
    let foo = &config.contracts["Foo"];
    assert_eq!(foo.variable("x"), Some(&ConfigVariable::from(1i64)));
    assert_eq!(
        foo.variable("y"),
        Some(&ConfigVariable::Array(vec![true.into(), "s".into()]))
    );

    let canonical = canonicalize(&config, &example_outputs()).unwrap();
    assert_eq!(canonical.sources.len(), 1);
    assert_eq!(canonical.sources[0].language, SourceLanguage::Solidity);
    assert_eq!(canonical.sources[0].version, "0.8.0");
    assert_eq!(
        canonical.sources[0].input,
        json!([{"content": "contract Foo {}"}])
    );
}

// ---------------------------------------------------------------------------
// 2. Round-trip through canonical bytes
// ---------------------------------------------------------------------------

#[test]
fn canonical_bytes_reparse_as_raw_and_canonical_config() {
    let config = validate(&example_config()).unwrap();
    let canonical = canonicalize(&config, &example_outputs()).unwrap();
    let bytes = canonical.canonical_bytes().unwrap();

    let reparsed: serde_json::Value = serde_json::from_slice(bytes.as_bytes()).unwrap();

    let as_raw = validate(&reparsed).unwrap();
    assert_eq!(as_raw, config);

    let as_canonical = validate_canonical(&reparsed).unwrap();
    assert_eq!(as_canonical.sources, canonical.sources);
    assert_eq!(as_canonical, canonical);
}

#[test]
fn digest_is_stable_across_reparse() {
    let config = validate(&example_config()).unwrap();
    let canonical = canonicalize(&config, &example_outputs()).unwrap();
    let bytes = canonical.canonical_bytes().unwrap();

    let reparsed: serde_json::Value = serde_json::from_slice(bytes.as_bytes()).unwrap();
    let again = validate_canonical(&reparsed).unwrap();

    assert_eq!(canonical.digest().unwrap(), again.digest().unwrap());
    assert_eq!(
        sha256_digest(&CanonicalBytes::new(&reparsed).unwrap()),
        canonical.digest().unwrap()
    );
}

#[test]
fn canonical_bytes_have_sorted_keys_on_one_line() {
    let config = validate(&example_config()).unwrap();
    let canonical = canonicalize(&config, &example_outputs()).unwrap();
    let bytes = canonical.canonical_bytes().unwrap();
    let text = std::str::from_utf8(bytes.as_bytes()).unwrap();

    let contracts = text.find("\"contracts\"").unwrap();
    let options = text.find("\"options\"").unwrap();
    let sources = text.find("\"sources\"").unwrap();
    assert!(contracts < options && options < sources);
    assert!(!text.contains('\n'));
}

// ---------------------------------------------------------------------------
// 3. Source coverage
// ---------------------------------------------------------------------------

#[test]
fn shared_sources_are_listed_once() {
    let raw = json!({
        "options": {"name": "Multi", "owner": "0x1"},
        "contracts": {
            "TokenA": {"source": "Token.sol"},
            "TokenB": {"source": "Token.sol"},
            "Vault": {"source": "Vault.sol", "address": "0x1111111111111111111111111111111111111111"}
        }
    });
    let config = validate(&raw).unwrap();

    let mut outputs = CompileOutputs::new();
    for name in ["Token.sol", "Vault.sol"] {
        outputs.insert(name.to_string(), CompilerOutput::solidity("0.8.0", json!([name])));
    }

    let canonical = canonicalize(&config, &outputs).unwrap();
    assert_eq!(canonical.source_names(), vec!["Token.sol", "Vault.sol"]);
    assert_eq!(
        canonical.source_for("TokenB").unwrap().input,
        json!(["Token.sol"])
    );
    assert_eq!(canonical.source_for("Vault").unwrap().input, json!(["Vault.sol"]));
}

#[test]
fn missing_output_is_reported_by_name() {
    let config = validate(&example_config()).unwrap();
    let err = canonicalize(&config, &CompileOutputs::new()).unwrap_err();
    assert_eq!(
        err,
        CanonicalizationError::MissingCompilation {
            source_name: "Foo.sol".to_string()
        }
    );
}

// ---------------------------------------------------------------------------
// 4. Validation failures
// ---------------------------------------------------------------------------

#[test]
fn missing_name_is_reported_at_options_name() {
    let err = validate(&json!({"options": {"owner": "0x1"}, "contracts": {}})).unwrap_err();
    let violations = err.violations().unwrap();
    assert!(violations
        .find("options.name", ViolationReason::MissingField)
        .is_some());
}

#[test]
fn canonical_with_too_few_sources_is_rejected() {
    let mut raw = example_config();
    raw["sources"] = json!([]);
    let err = validate_canonical(&raw).unwrap_err();
    assert!(err
        .violations()
        .unwrap()
        .find("sources", ViolationReason::SourceCountMismatch)
        .is_some());
}

// ---------------------------------------------------------------------------
// 5. Compile then canonicalize
// ---------------------------------------------------------------------------

#[tokio::test]
async fn precomputed_outputs_drive_the_full_pipeline() {
    let config = validate(&example_config()).unwrap();
    let from_pipeline = compile_and_canonicalize(&config, Arc::new(example_outputs()))
        .await
        .unwrap();
    let direct = canonicalize(&config, &example_outputs()).unwrap();
    assert_eq!(from_pipeline, direct);
}
