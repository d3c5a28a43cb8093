//! Dependency-ordered lifecycle driver (C4): sequential apply with
//! per-node readiness gating, parallel teardown, and restart as their
//! composition.

use crate::error::OrchestratorError;
use crate::node::Node;
use forge_engine::ContainerEngine;
use forge_ledger::{Ledger, Resource, ResourceType};
use futures::future::join_all;
use std::sync::Arc;

/// Start every node in `nodes`, in order, blocking on readiness between
/// each. Aborts on the first failure — already-started nodes stay in the
/// ledger; an explicit teardown is required to clean them up.
pub async fn apply(nodes: &[Node], network_id: &str) -> Result<(), OrchestratorError> {
    for node in nodes {
        node.start(network_id).await?;
        node.is_ready().await?;
    }
    Ok(())
}

/// Stop and remove every ledger-recorded resource for `app_name`.
/// Containers are processed in parallel (one task per container); only
/// once every container has been handled are networks removed. A
/// "not found" from the engine is treated as success — the artifact is
/// already gone — and the ledger row is still dropped.
pub async fn teardown(
    engine: &Arc<dyn ContainerEngine>,
    ledger: &Arc<Ledger>,
    app_name: &str,
) -> Result<(), OrchestratorError> {
    let resources = ledger.list_by_app(app_name);
    let (containers, networks): (Vec<Resource>, Vec<Resource>) = resources
        .into_iter()
        .partition(|r| r.resource_type == ResourceType::Container);

    let container_results = join_all(containers.into_iter().map(|resource| {
        let engine = Arc::clone(engine);
        let ledger = Arc::clone(ledger);
        async move { remove_container(&engine, &ledger, &resource.resource_id).await }
    }))
    .await;

    let mut failures = container_results.into_iter().filter(|r| r.is_err()).count();

    for resource in networks {
        if remove_network(engine, ledger, &resource.resource_id).await.is_err() {
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(OrchestratorError::PartialTeardownFailure { failure_count: failures });
    }
    Ok(())
}

async fn remove_container(
    engine: &Arc<dyn ContainerEngine>,
    ledger: &Arc<Ledger>,
    id: &str,
) -> Result<(), OrchestratorError> {
    let stop_result = engine.stop_container(id, 30).await;
    if let Err(e) = stop_result {
        if !e.is_not_found() {
            tracing::warn!(id, error = %e, "stop_container failed, attempting remove anyway");
        }
    }

    match engine.remove_container(id, true).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            tracing::warn!(id, "container already gone outside the system, dropping stale ledger row");
        }
        Err(e) => return Err(OrchestratorError::Engine(e)),
    }

    ledger.remove_by_id(id).ok();
    Ok(())
}

async fn remove_network(
    engine: &Arc<dyn ContainerEngine>,
    ledger: &Arc<Ledger>,
    id: &str,
) -> Result<(), OrchestratorError> {
    match engine.remove_network(id).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            tracing::warn!(id, "network already gone outside the system, dropping stale ledger row");
        }
        Err(e) => return Err(OrchestratorError::Engine(e)),
    }
    ledger.remove_by_id(id).ok();
    Ok(())
}

/// Down followed by Apply. When `force` is set, a Down failure is logged
/// rather than propagated, and Apply proceeds anyway.
pub async fn restart(
    engine: &Arc<dyn ContainerEngine>,
    ledger: &Arc<Ledger>,
    app_name: &str,
    force: bool,
    nodes: &[Node],
    network_id: &str,
) -> Result<(), OrchestratorError> {
    match teardown(engine, ledger, app_name).await {
        Ok(()) => {}
        Err(e) if force => tracing::warn!(app = app_name, error = %e, "restart: down failed, proceeding with --force"),
        Err(e) => return Err(e),
    }
    apply(nodes, network_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_line::LogSink;
    use crate::naming::network_name;
    use crate::node::{DataStoreNode, NodeContext, ServiceNode};
    use crate::readiness::ReadinessConfig;
    use forge_engine::fake::FakeEngine;
    use forge_manifest::{DataStore, Service};
    use std::time::Duration;

    fn ctx(app_name: &str, engine: &Arc<dyn ContainerEngine>, ledger: &Arc<Ledger>, sink: LogSink) -> NodeContext {
        NodeContext {
            app_name: app_name.to_string(),
            engine: Arc::clone(engine),
            ledger: Arc::clone(ledger),
            log_sink: sink,
            readiness: ReadinessConfig {
                dial_timeout: Duration::from_millis(50),
                retry_interval: Duration::from_millis(20),
                overall_timeout: Duration::from_millis(100),
            },
        }
    }

    fn open_ledger(dir: &tempfile::TempDir) -> Arc<Ledger> {
        Arc::new(Ledger::open(&dir.path().join("forge.db")).unwrap())
    }

    #[tokio::test]
    async fn apply_starts_nodes_with_no_port_and_records_resources() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = open_ledger(&dir);
        let engine: Arc<dyn ContainerEngine> = Arc::new(FakeEngine::new());

        let db = DataStore {
            name: "db".into(),
            r#type: Some("postgres".into()),
            version: Some("14".into()),
            port: None,
            internal_port: None,
            depends_on: vec![],
            env: vec![],
        };
        let api = Service {
            name: "api".into(),
            image: Some("hello-world:latest".into()),
            path: None,
            repo: None,
            port: None,
            internal_port: None,
            depends_on: vec!["db".into()],
            env: vec![],
        };

        let nodes: Vec<Node> = vec![
            Node::DataStore(DataStoreNode { store: db, ctx: ctx("demo", &engine, &ledger, None) }),
            Node::Service(ServiceNode { service: api, ctx: ctx("demo", &engine, &ledger, None) }),
        ];

        apply(&nodes, "net-0").await.unwrap();
        let resources = ledger.list_by_app("demo");
        assert_eq!(resources.len(), 2);
    }

    #[tokio::test]
    async fn apply_aborts_on_first_failure_and_leaves_ledger_row() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = open_ledger(&dir);
        let engine_impl = FakeEngine::new();
        engine_impl.fail_on_start.lock().push("api".to_string());
        let engine: Arc<dyn ContainerEngine> = Arc::new(engine_impl);

        let db = DataStore {
            name: "db".into(),
            r#type: Some("postgres".into()),
            version: Some("14".into()),
            port: None,
            internal_port: None,
            depends_on: vec![],
            env: vec![],
        };
        let api = Service {
            name: "api".into(),
            image: Some("hello-world:latest".into()),
            path: None,
            repo: None,
            port: None,
            internal_port: None,
            depends_on: vec!["db".into()],
            env: vec![],
        };

        let nodes: Vec<Node> = vec![
            Node::DataStore(DataStoreNode { store: db, ctx: ctx("demo", &engine, &ledger, None) }),
            Node::Service(ServiceNode { service: api, ctx: ctx("demo", &engine, &ledger, None) }),
        ];

        let err = apply(&nodes, "net-0").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::NodeStartFailed { .. }));
        // `db` already started and is still recorded; `api` never was.
        assert_eq!(ledger.list_by_app("demo").len(), 1);
    }

    #[tokio::test]
    async fn teardown_empties_the_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = open_ledger(&dir);
        let engine: Arc<dyn ContainerEngine> = Arc::new(FakeEngine::new());

        let net_id = engine.create_network(&network_name("demo")).await.unwrap();
        ledger.add("demo", ResourceType::Network, &net_id, forge_ledger::NETWORK_SERVICE_NAME).unwrap();
        let ctr_id = engine
            .create_container(forge_engine::types::ContainerSpec {
                name: "forge-demo-api-aaaaaaaa".into(),
                image: "hello-world:latest".into(),
                env: vec![],
                port: None,
                network: forge_engine::types::NetworkAttachment { network_id: net_id.clone(), alias: "api".into() },
            })
            .await
            .unwrap();
        engine.start_container(&ctr_id).await.unwrap();
        ledger.add("demo", ResourceType::Container, &ctr_id, "api").unwrap();

        teardown(&engine, &ledger, "demo").await.unwrap();
        assert!(ledger.list_by_app("demo").is_empty());
    }

    #[tokio::test]
    async fn teardown_treats_stale_rows_as_success() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = open_ledger(&dir);
        let engine: Arc<dyn ContainerEngine> = Arc::new(FakeEngine::new());

        // A row whose artifact was never actually created by this engine
        // instance, simulating out-of-band removal.
        ledger.add("demo", ResourceType::Container, "ghost-ctr", "api").unwrap();

        teardown(&engine, &ledger, "demo").await.unwrap();
        assert!(ledger.list_by_app("demo").is_empty());
    }
}
