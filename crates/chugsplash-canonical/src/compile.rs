//! # Concurrent compilation
//!
//! Runs the compiler once per distinct source and joins every run before
//! canonicalizing. Compilers are synchronous and CPU-bound, so each run is
//! placed on the blocking pool.
//!
//! All runs are awaited even after one fails, so no compile task outlives
//! the call. When several fail, the error for the lowest source name is
//! returned, which keeps the reported error independent of scheduling.

use std::collections::BTreeMap;
use std::sync::Arc;

use chugsplash_core::{CanonicalChugSplashConfig, ChugSplashConfig};

use crate::canonicalize::{canonicalize, CompileOutputs, CompilerOutput};
use crate::error::{CompileError, PipelineError};

/// Produces compiler output for one source.
pub trait SourceCompiler: Send + Sync {
    /// Compile `source_name`.
    fn compile(&self, source_name: &str) -> Result<CompilerOutput, CompileError>;
}

/// Precomputed outputs act as a compiler that looks sources up.
impl SourceCompiler for CompileOutputs {
    fn compile(&self, source_name: &str) -> Result<CompilerOutput, CompileError> {
        self.get(source_name)
            .cloned()
            .ok_or_else(|| CompileError::Failed {
                source_name: source_name.to_string(),
                reason: "no precomputed output".to_string(),
            })
    }
}

/// Compile every distinct source referenced by `config` concurrently.
///
/// # Errors
///
/// The error for the first failing source in name order.
pub async fn compile_sources(
    config: &ChugSplashConfig,
    compiler: Arc<dyn SourceCompiler>,
) -> Result<CompileOutputs, CompileError> {
    let handles: Vec<_> = config
        .distinct_sources()
        .into_iter()
        .map(|name| {
            let name = name.to_string();
            let compiler = Arc::clone(&compiler);
            let task_name = name.clone();
            let handle = tokio::task::spawn_blocking(move || compiler.compile(&task_name));
            (name, handle)
        })
        .collect();

    tracing::debug!(sources = handles.len(), "compiling sources");

    let mut outputs = BTreeMap::new();
    let mut first_error = None;

    for (name, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(CompileError::TaskAborted {
                source_name: name.clone(),
                reason: join_err.to_string(),
            }),
        };
        match result {
            Ok(output) => {
                outputs.insert(name, output);
            }
            Err(e) => {
                tracing::warn!(source = %name, error = %e, "compilation failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(outputs),
    }
}

/// Compile all sources of `config`, then canonicalize.
pub async fn compile_and_canonicalize(
    config: &ChugSplashConfig,
    compiler: Arc<dyn SourceCompiler>,
) -> Result<CanonicalChugSplashConfig, PipelineError> {
    let outputs = compile_sources(config, compiler).await?;
    Ok(canonicalize(config, &outputs)?)
}
