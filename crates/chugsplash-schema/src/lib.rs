//! # chugsplash-schema: Config Validation
//!
//! Narrows untyped input into the typed configs defined in
//! `chugsplash-core`, or explains precisely why it cannot.
//!
//! ## Runtime Validation (`validate`)
//!
//! - [`validate`] / [`Validator::validate`]: raw config.
//! - [`validate_canonical`] / [`Validator::validate_canonical`]: canonical
//!   config, including the `sources` list.
//!
//! Every violation carries a [`FieldPath`] such as
//! `contracts.Foo.variables.bar[2]` and a [`ViolationReason`] code.
//!
//! ## Documents (`document`)
//!
//! [`parse_document`] parses JSON or YAML text and reports repeated mapping
//! keys as `DuplicateKey` violations, which a plain `serde_json::Value`
//! would silently swallow.
//!
//! ## Crate Policy
//!
//! - Depends only on `chugsplash-core` internally.
//! - Pure functions: no IO, no logging, no global state.

pub mod document;
pub mod options;
pub mod path;
pub mod validate;

pub use document::{
    parse_document, validate_canonical_document, validate_document, DocumentFormat,
};
pub use options::{AddressFormat, ValidationOptions, DEFAULT_MAX_DEPTH};
pub use path::{FieldPath, PathSegment};
pub use validate::{
    validate, validate_canonical, ValidationError, ValidationViolations, Validator, Violation,
    ViolationReason,
};
