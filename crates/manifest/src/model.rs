//! Typed representation of a `forge.yaml` manifest.

use serde::{Deserialize, Serialize};

/// The only schema version this crate understands.
pub const SCHEMA_VERSION: u32 = 1;

/// A fully decoded manifest, as read from disk before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    #[serde(rename = "appName")]
    pub app_name: String,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub databases: Vec<DataStore>,
}

impl Manifest {
    /// Iterate every node (service or data store) by its logical name.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.services
            .iter()
            .map(|s| s.name.as_str())
            .chain(self.databases.iter().map(|d| d.name.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, rename = "internalPort", skip_serializing_if = "Option::is_none")]
    pub internal_port: Option<u16>,
    #[serde(default, rename = "dependsOn")]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub env: Vec<String>,
}

impl Service {
    /// How many of `image`/`path`/`repo` are set. Validity is exactly 1.
    pub fn source_count(&self) -> usize {
        [self.image.is_some(), self.path.is_some(), self.repo.is_some()]
            .into_iter()
            .filter(|set| *set)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataStore {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, rename = "internalPort", skip_serializing_if = "Option::is_none")]
    pub internal_port: Option<u16>,
    #[serde(default, rename = "dependsOn")]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub env: Vec<String>,
}

impl DataStore {
    pub fn image_ref(&self) -> Option<String> {
        match (&self.r#type, &self.version) {
            (Some(t), Some(v)) => Some(format!("{t}:{v}")),
            _ => None,
        }
    }
}
