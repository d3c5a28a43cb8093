//! Resolve a `repo:` source into a local build context via a shallow
//! clone. The clone lives under a [`tempfile::TempDir`] so it is removed
//! on every exit path, success or error, by RAII.

use crate::error::OrchestratorError;
use tempfile::TempDir;
use tokio::process::Command;

pub async fn shallow_clone(url: &str) -> Result<TempDir, OrchestratorError> {
    let dir = tempfile::tempdir().map_err(|e| OrchestratorError::Internal(e.to_string()))?;

    let status = Command::new("git")
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg(url)
        .arg(dir.path())
        .status()
        .await
        .map_err(|e| OrchestratorError::Internal(format!("failed to spawn git: {e}")))?;

    if !status.success() {
        return Err(OrchestratorError::Internal(format!(
            "git clone of '{url}' exited with {status}"
        )));
    }

    Ok(dir)
}
