use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Network rows use this sentinel in place of a node name.
pub const NETWORK_SERVICE_NAME: &str = "__network__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Container,
    Network,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Container => "container",
            ResourceType::Network => "network",
        }
    }
}

/// A single row of the resource ledger: one artifact the engine created on
/// this system's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub resource_id: String,
    pub app_name: String,
    pub resource_type: ResourceType,
    pub service_name: String,
    pub created_at: DateTime<Utc>,
}
