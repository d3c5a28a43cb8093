use crate::graph::topo_order;
use crate::model::Manifest;
use crate::{ManifestError, SCHEMA_VERSION};
use std::collections::HashSet;

/// Validate a decoded manifest. Pure function, no I/O: it never looks at
/// the filesystem, so relative `path` entries are accepted as-is (the
/// client is responsible for anchoring them before the daemon sees them).
pub fn validate(manifest: &Manifest) -> Result<(), ManifestError> {
    if manifest.version != SCHEMA_VERSION {
        return Err(ManifestError::UnsupportedVersion(manifest.version));
    }
    if manifest.app_name.trim().is_empty() {
        return Err(ManifestError::EmptyAppName);
    }

    let mut seen = HashSet::new();
    for name in manifest.node_names() {
        if !is_valid_node_name(name) {
            return Err(ManifestError::InvalidNodeName(name.to_string()));
        }
        if !seen.insert(name) {
            return Err(ManifestError::DuplicateNodeName(name.to_string()));
        }
    }

    for service in &manifest.services {
        let count = service.source_count();
        if count != 1 {
            return Err(ManifestError::AmbiguousServiceSource(service.name.clone(), count));
        }
    }

    for store in &manifest.databases {
        if store.image_ref().is_none() {
            return Err(ManifestError::DataStoreMissingImage(store.name.clone()));
        }
    }

    let nodes: Vec<(String, Vec<String>)> = manifest
        .services
        .iter()
        .map(|s| (s.name.clone(), s.depends_on.clone()))
        .chain(manifest.databases.iter().map(|d| (d.name.clone(), d.depends_on.clone())))
        .collect();

    // topo_order() rejects unresolved deps and cycles with the same error
    // kinds the scheduler would report at apply time; running it here lets
    // InvalidManifest catch both before any engine call is made.
    topo_order(&nodes)?;

    Ok(())
}

fn is_valid_node_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
