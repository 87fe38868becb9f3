//! # chugsplash-canonical: Canonical Config Production
//!
//! Turns a validated `ChugSplashConfig` plus compiler outputs into a
//! `CanonicalChugSplashConfig`.
//!
//! - [`canonicalize`] attaches precomputed outputs. Pure.
//! - [`compile_sources`] runs a [`SourceCompiler`] for every distinct source
//!   concurrently and waits for all of them.
//! - [`compile_and_canonicalize`] does both.
//!
//! Output is a function of its inputs only: sources are ordered by name
//! regardless of the order in which compiles complete.

pub mod canonicalize;
pub mod compile;
pub mod error;

pub use canonicalize::{canonicalize, CompileOutputs, CompilerOutput};
pub use compile::{compile_and_canonicalize, compile_sources, SourceCompiler};
pub use error::{CanonicalizationError, CompileError, PipelineError};
