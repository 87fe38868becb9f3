//! Canonicalizer and compiler-join errors.
//!
//! A `CanonicalizationError` means the caller ran the pipeline out of order
//! (canonicalizing before every source was compiled) or the compiler layer
//! produced something this format cannot carry. Neither is retried here.

use thiserror::Error;

/// Error attaching compiler outputs to a config.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// A contract references a source with no compiler output.
    #[error("no compiler output for source {source_name:?}")]
    MissingCompilation {
        /// The uncompiled source name.
        source_name: String,
    },

    /// A compiler output declares a language outside the supported set.
    #[error("source {source_name:?} declares unsupported language {language:?}")]
    UnsupportedLanguage {
        /// Source name.
        source_name: String,
        /// The declared language.
        language: String,
    },

    /// A compiler output's input payload holds a fractional number, which
    /// canonical bytes cannot carry.
    #[error("compiler input for {source_name:?} contains non-integer number {value}")]
    NonIntegerInput {
        /// Source name.
        source_name: String,
        /// The offending number as written.
        value: String,
    },
}

/// Error compiling one source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The compiler rejected the source or could not be run.
    #[error("compiling {source_name:?} failed: {reason}")]
    Failed {
        /// Source name.
        source_name: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// The compile task panicked or was cancelled before finishing.
    #[error("compile task for {source_name:?} did not complete: {reason}")]
    TaskAborted {
        /// Source name.
        source_name: String,
        /// Join failure description.
        reason: String,
    },
}

impl CompileError {
    /// The source this error is about.
    pub fn source_name(&self) -> &str {
        match self {
            Self::Failed { source_name, .. } | Self::TaskAborted { source_name, .. } => source_name,
        }
    }
}

/// Error from the combined compile-then-canonicalize pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A source failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Compiler outputs could not be attached.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}
