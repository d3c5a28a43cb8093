use thiserror::Error;

/// Errors surfaced while decoding or validating a manifest.
///
/// Every variant carries enough context to become a single, precise
/// user-facing line — the daemon never has to guess what was wrong.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("failed to parse manifest: {0}")]
    Decode(String),

    #[error("unsupported schema version: {0} (expected {expected})", expected = crate::SCHEMA_VERSION)]
    UnsupportedVersion(u32),

    #[error("appName must not be empty")]
    EmptyAppName,

    #[error("node name '{0}' is invalid: must match ^[a-z0-9][a-z0-9-]*$")]
    InvalidNodeName(String),

    #[error("duplicate node name '{0}'")]
    DuplicateNodeName(String),

    #[error("data store '{0}' must specify both 'type' and 'version'")]
    DataStoreMissingImage(String),

    #[error("service '{0}' must specify exactly one of image|path|repo, found {1}")]
    AmbiguousServiceSource(String, usize),

    #[error("node '{0}' depends on undefined node '{1}'")]
    UndefinedDependency(String, String),

    #[error("dependency cycle detected at node '{0}'")]
    DependencyCycle(String),
}
