use thiserror::Error;

/// Errors surfaced by the container engine adapter.
///
/// `NotFound` is broken out from the generic `Transient`/`Unavailable`
/// cases because the lifecycle driver treats it specially: removing an
/// already-gone container or network is success, not failure.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("container engine unreachable: {0}")]
    Unavailable(String),

    #[error("container engine request failed: {0}")]
    Transient(String),

    #[error("build failed: {0}")]
    BuildFailed(String),

    #[error("{0}")]
    Internal(String),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound { .. })
    }
}

impl From<bollard::errors::Error> for EngineError {
    fn from(err: bollard::errors::Error) -> Self {
        use bollard::errors::Error as BErr;
        match &err {
            BErr::DockerResponseServerError { status_code, message } if *status_code == 404 => {
                EngineError::NotFound {
                    kind: "resource",
                    id: message.clone(),
                }
            }
            BErr::DockerResponseServerError { status_code, message } if *status_code >= 500 => {
                EngineError::Transient(message.clone())
            }
            BErr::HyperResponseError { .. } | BErr::IOError { .. } => {
                EngineError::Unavailable(err.to_string())
            }
            _ => EngineError::Internal(err.to_string()),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Internal(err.to_string())
    }
}
