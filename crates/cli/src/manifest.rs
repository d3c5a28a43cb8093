//! Client-side manifest handling: load the file the user pointed at and
//! rewrite relative `path` entries to absolute paths anchored at the
//! manifest's directory (§4.1, §4.8) — the daemon's filesystem view may
//! differ from the client's, so this must happen before the manifest ever
//! crosses the RPC boundary.

use forge_manifest::Manifest;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ManifestLoadError {
    #[error("failed to read manifest at {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error(transparent)]
    Decode(#[from] forge_manifest::ManifestError),

    #[error("failed to re-encode manifest: {0}")]
    Encode(#[from] serde_yaml::Error),
}

/// Load and decode the manifest at `path`, returning both the decoded
/// value (for reading `appName`, listing services, etc.) and the raw YAML
/// bytes with every relative `path` rewritten to absolute.
pub fn load(path: &Path) -> Result<(Manifest, Vec<u8>), ManifestLoadError> {
    let raw = std::fs::read(path).map_err(|source| ManifestLoadError::Read { path: path.to_path_buf(), source })?;
    let mut manifest = forge_manifest::parse(&raw)?;

    let anchor = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    for service in manifest.services.iter_mut() {
        if let Some(p) = &service.path {
            let candidate = Path::new(p);
            if candidate.is_relative() {
                service.path = Some(anchor.join(candidate).to_string_lossy().into_owned());
            }
        }
    }

    let rewritten = serde_yaml::to_vec(&manifest)?;
    Ok((manifest, rewritten))
}

/// Read just enough of the manifest to recover its `appName`, for
/// commands whose `appName` argument defaults from the manifest in the
/// current directory (`down`, `restart`).
pub fn app_name(path: &Path) -> Result<String, ManifestLoadError> {
    let (manifest, _) = load(path)?;
    Ok(manifest.app_name)
}
