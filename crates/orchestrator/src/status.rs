//! `Inspect`: reconcile the ledger's intent against the engine's actual
//! state, surfacing drift as a "stale" row rather than failing.

use forge_engine::ContainerEngine;
use forge_ledger::{Resource, ResourceType};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ServiceStatus {
    pub app_name: String,
    pub service_name: String,
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub created: Option<chrono::DateTime<chrono::Utc>>,
    pub status: String,
    pub ports: Vec<(u16, u16)>,
}

/// The resourceId rendering for a row the engine no longer recognizes.
pub const STALE_RESOURCE_ID: &str = "not found";

pub async fn resource_status(engine: &Arc<dyn ContainerEngine>, resource: &Resource) -> ServiceStatus {
    if resource.resource_type != ResourceType::Container {
        return ServiceStatus {
            app_name: resource.app_name.clone(),
            service_name: resource.service_name.clone(),
            resource_type: resource.resource_type,
            resource_id: resource.resource_id.clone(),
            created: Some(resource.created_at),
            status: "network".to_string(),
            ports: vec![],
        };
    }

    match engine.inspect_container(&resource.resource_id).await {
        Ok(inspect) => {
            let status = if inspect.running {
                "Up".to_string()
            } else {
                format!("Exited ({})", inspect.exit_code.unwrap_or(-1))
            };
            ServiceStatus {
                app_name: resource.app_name.clone(),
                service_name: resource.service_name.clone(),
                resource_type: resource.resource_type,
                resource_id: resource.resource_id.clone(),
                created: inspect.created.or(Some(resource.created_at)),
                status,
                ports: inspect.port_bindings.into_iter().map(|p| (p.host_port, p.internal_port)).collect(),
            }
        }
        Err(e) if e.is_not_found() => ServiceStatus {
            app_name: resource.app_name.clone(),
            service_name: resource.service_name.clone(),
            resource_type: resource.resource_type,
            resource_id: STALE_RESOURCE_ID.to_string(),
            created: None,
            status: "Stale (removed outside the system)".to_string(),
            ports: vec![],
        },
        Err(e) => ServiceStatus {
            app_name: resource.app_name.clone(),
            service_name: resource.service_name.clone(),
            resource_type: resource.resource_type,
            resource_id: resource.resource_id.clone(),
            created: Some(resource.created_at),
            status: format!("unknown ({e})"),
            ports: vec![],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_engine::fake::FakeEngine;

    #[tokio::test]
    async fn missing_container_is_reported_stale() {
        let engine: Arc<dyn ContainerEngine> = Arc::new(FakeEngine::new());
        let resource = Resource {
            resource_id: "ghost".into(),
            app_name: "demo".into(),
            resource_type: ResourceType::Container,
            service_name: "api".into(),
            created_at: chrono::Utc::now(),
        };
        let status = resource_status(&engine, &resource).await;
        assert_eq!(status.resource_id, STALE_RESOURCE_ID);
        assert_eq!(status.status, "Stale (removed outside the system)");
    }
}
