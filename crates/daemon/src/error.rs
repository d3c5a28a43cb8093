//! Map [`OrchestratorError`] onto the gRPC status codes §7 specifies.

use forge_orchestrator::OrchestratorError;
use tonic::{Code, Status};

pub fn to_status(err: OrchestratorError) -> Status {
    let code = match &err {
        OrchestratorError::InvalidManifest(_) => Code::InvalidArgument,
        OrchestratorError::Conflict(_) => Code::AlreadyExists,
        OrchestratorError::NotFound(_) => Code::NotFound,
        OrchestratorError::Engine(e) if e.is_not_found() => Code::NotFound,
        OrchestratorError::Engine(_) => Code::Unavailable,
        OrchestratorError::Ledger(_) => Code::Internal,
        OrchestratorError::TimedOut { .. } => Code::DeadlineExceeded,
        OrchestratorError::Canceled => Code::Cancelled,
        OrchestratorError::NodeStartFailed { .. } => Code::Unavailable,
        OrchestratorError::PartialTeardownFailure { .. } => Code::Internal,
        OrchestratorError::Internal(_) => Code::Internal,
    };
    Status::new(code, err.to_string())
}
