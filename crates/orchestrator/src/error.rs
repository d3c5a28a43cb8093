use forge_engine::EngineError;
use forge_ledger::LedgerError;
use forge_manifest::ManifestError;
use thiserror::Error;

/// Errors surfaced by the orchestrator. Variant names mirror §7 of the
/// requirements document so the RPC layer can map them 1:1 to gRPC status
/// codes without re-deriving the classification.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    InvalidManifest(#[from] ManifestError),

    #[error("application '{0}' already has live resources")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("node '{node}' did not become ready within {timeout_secs}s")]
    TimedOut { node: String, timeout_secs: u64 },

    #[error("canceled")]
    Canceled,

    #[error("starting node '{node}' failed: {source}")]
    NodeStartFailed {
        node: String,
        #[source]
        source: EngineError,
    },

    #[error("teardown completed with {failure_count} failure(s); see logs for detail")]
    PartialTeardownFailure { failure_count: usize },

    #[error("internal error: {0}")]
    Internal(String),
}

impl OrchestratorError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, OrchestratorError::NotFound(_))
            || matches!(self, OrchestratorError::Engine(e) if e.is_not_found())
    }
}
