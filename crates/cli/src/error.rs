//! Client-side error types.
//!
//! `ExitError` carries a process exit code so `main` can translate any
//! failure into the single-red-line-plus-nonzero-exit contract from §7
//! without each command calling `std::process::exit` itself.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not reachable at {0}")]
    Unreachable(String),

    #[error("could not locate the forged binary on PATH or alongside this executable")]
    BinaryNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transport(#[from] tonic::transport::Error),
}

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        ExitError { code, message: message.into() }
    }

    /// The exit code every non-exec command failure uses (§6, §7).
    pub fn failure(message: impl Into<String>) -> Self {
        ExitError::new(1, message)
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<anyhow::Error> for ExitError {
    fn from(err: anyhow::Error) -> Self {
        ExitError::failure(err.to_string())
    }
}

impl From<ClientError> for ExitError {
    fn from(err: ClientError) -> Self {
        ExitError::failure(err.to_string())
    }
}

impl From<tonic::Status> for ExitError {
    fn from(status: tonic::Status) -> Self {
        ExitError::failure(format!("{} ({:?})", status.message(), status.code()))
    }
}

impl From<crate::manifest::ManifestLoadError> for ExitError {
    fn from(err: crate::manifest::ManifestLoadError) -> Self {
        ExitError::failure(err.to_string())
    }
}

impl From<std::io::Error> for ExitError {
    fn from(err: std::io::Error) -> Self {
        ExitError::failure(err.to_string())
    }
}
