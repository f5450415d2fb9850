use esforge_diagnostics::Diagnostic;
use esforge_transformers::PipelineError;
use thiserror::Error;

/// Why a bundle request produced no output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BundleError {
    /// The cancellation token fired; in-flight fetches were dropped.
    #[error("bundle cancelled")]
    Cancelled,

    /// At least one reachable module is Errored. Carries every diagnostic
    /// collected across the graph, not just the first failure.
    #[error("bundle failed with {} diagnostic(s)", diagnostics.len())]
    Failed {
        diagnostics: Vec<Diagnostic>,
        module_order: Vec<String>,
    },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
