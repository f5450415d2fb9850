use std::io;

use esforge_bundler::BundleError;
use esforge_sourcemap::SourceMapError;
use esforge_transformers::PipelineError;
use thiserror::Error;

/// A request that produced no result at all.
///
/// Everything recoverable is reported as a diagnostic next to a best-effort
/// result instead; these variants are the cases where no such result exists.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("source is {len} bytes, which exceeds the limit of {limit} bytes")]
    SourceTooLarge { len: usize, limit: usize },

    #[error("source is not valid UTF-8")]
    InvalidEncoding,

    #[error("invalid syntax tree: {0}")]
    InvalidAst(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error(transparent)]
    SourceMap(#[from] SourceMapError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl EngineError {
    /// Short stable name of the variant, used in logs and JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidRequest(_) => "invalid-request",
            EngineError::SourceTooLarge { .. } => "source-too-large",
            EngineError::InvalidEncoding => "invalid-encoding",
            EngineError::InvalidAst(_) => "invalid-ast",
            EngineError::Pipeline(_) => "pipeline",
            EngineError::Bundle(_) => "bundle",
            EngineError::SourceMap(_) => "source-map",
            EngineError::Io(_) => "io",
        }
    }
}
