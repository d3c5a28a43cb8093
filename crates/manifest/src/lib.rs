//! Manifest model, YAML decode, and structural validation.
//!
//! This crate has no I/O beyond `serde_yaml` decoding: it never touches the
//! filesystem or the network, so it can run identically on the client (for
//! path-rewriting) and on the daemon (for validation before orchestration).

mod error;
pub mod graph;
mod model;
mod validate;

pub use error::ManifestError;
pub use model::{DataStore, Manifest, Service, SCHEMA_VERSION};
pub use validate::validate;

/// Decode a manifest from raw YAML bytes. Does not validate; call
/// [`validate`] on the result before acting on it.
pub fn parse(content: &[u8]) -> Result<Manifest, ManifestError> {
    if content.is_empty() {
        return Err(ManifestError::Decode("manifest content must not be empty".into()));
    }
    serde_yaml::from_slice(content).map_err(|e| ManifestError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_validates_minimal_manifest() {
        let yaml = r#"
version: 1
appName: demo-1
databases:
  - name: db
    type: postgres
    version: "14"
    port: 5432
    internalPort: 5432
services:
  - name: api
    image: "hello-world:latest"
    port: 8080
    internalPort: 8080
    dependsOn: [db]
"#;
        let manifest = parse(yaml.as_bytes()).unwrap();
        assert_eq!(manifest.app_name, "demo-1");
        assert_eq!(manifest.services.len(), 1);
        assert_eq!(manifest.databases.len(), 1);
        validate(&manifest).unwrap();
    }

    #[test]
    fn rejects_empty_content() {
        let err = parse(b"").unwrap_err();
        assert!(matches!(err, ManifestError::Decode(_)));
    }
}
