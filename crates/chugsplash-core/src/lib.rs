//! # chugsplash-core: Deployment Config Model
//!
//! This crate defines the data contract shared by every other crate in the
//! workspace: the recursive [`ConfigVariable`] value, the author-facing
//! [`ChugSplashConfig`], and the publishable [`CanonicalChugSplashConfig`]
//! that carries compiler inputs alongside the raw config.
//!
//! ## Key Design Principles
//!
//! 1. **Composition, not inheritance.** A canonical config embeds a raw config
//!    and adds `sources`. On the wire the two are flattened, so every canonical
//!    config is also a structurally valid raw config.
//!
//! 2. **Sorted maps everywhere.** Contracts, variables and object-valued
//!    variables are `BTreeMap`s. Insertion order never leaks into output.
//!
//! 3. **`CanonicalBytes` newtype.** All bytes that get hashed or published
//!    flow through `CanonicalBytes::new()` (RFC 8785 / JCS).
//!
//! 4. **`sha256_digest()` accepts only `&CanonicalBytes`.** A digest over
//!    non-canonical bytes cannot be expressed.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `chugsplash-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod config;
pub mod digest;
pub mod error;
pub mod variable;

pub use canonical::CanonicalBytes;
pub use config::{
    CanonicalChugSplashConfig, ChugSplashConfig, CompilerSource, ConfigOptions, ContractConfig,
    Deployment, SourceLanguage,
};
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm, DigestParseError};
pub use error::CanonicalBytesError;
pub use variable::ConfigVariable;
