//! The scheduler's polymorphic view of a manifest entity: a small
//! capability set shared by services and data stores. The variant set is
//! closed and small (a service or a data store, never anything else), so
//! this is a tagged `enum` with a single `impl` block dispatching on
//! variant by `match`, not a trait-object hierarchy.

use crate::error::OrchestratorError;
use crate::log_line::{emit, LogSink};
use crate::naming::{container_name, image_tag};
use crate::readiness::{wait_until_ready, ReadinessConfig};
use forge_engine::types::{ContainerSpec, NetworkAttachment, PortBinding};
use forge_engine::ContainerEngine;
use forge_ledger::{Ledger, ResourceType};
use forge_manifest::{DataStore, Service};
use std::sync::Arc;

/// Shared plumbing every node variant needs: the engine to act through,
/// the ledger to record against, and where to send progress lines.
pub struct NodeContext {
    pub app_name: String,
    pub engine: Arc<dyn ContainerEngine>,
    pub ledger: Arc<Ledger>,
    pub log_sink: LogSink,
    pub readiness: ReadinessConfig,
}

pub struct ServiceNode {
    pub service: Service,
    pub ctx: NodeContext,
}

pub struct DataStoreNode {
    pub store: DataStore,
    pub ctx: NodeContext,
}

/// Either a `Service` or a `DataStore`, already holding the context its
/// lifecycle methods need.
pub enum Node {
    Service(ServiceNode),
    DataStore(DataStoreNode),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Service(n) => &n.service.name,
            Node::DataStore(n) => &n.store.name,
        }
    }

    pub fn dependencies(&self) -> &[String] {
        match self {
            Node::Service(n) => &n.service.depends_on,
            Node::DataStore(n) => &n.store.depends_on,
        }
    }

    pub fn host_port(&self) -> Option<u16> {
        match self {
            Node::Service(n) => n.service.port,
            Node::DataStore(n) => n.store.port,
        }
    }

    /// Resolve an image (pull/build as needed), create and start the
    /// container on `network_id`, and record it in the ledger. Returns the
    /// engine-assigned container id.
    pub async fn start(&self, network_id: &str) -> Result<String, OrchestratorError> {
        match self {
            Node::Service(n) => {
                let tag = crate::build::resolve_image(&n.ctx, &n.service).await?;
                start_container(
                    &n.ctx,
                    network_id,
                    self.name(),
                    &tag,
                    n.service.port,
                    n.service.internal_port,
                    &n.service.env,
                )
                .await
            }
            Node::DataStore(n) => {
                let reference = n.store.image_ref().ok_or_else(|| {
                    OrchestratorError::Internal(format!("data store '{}' missing image reference", self.name()))
                })?;
                emit(&n.ctx.log_sink, self.name(), format!("pulling {reference}")).await;
                n.ctx.engine.pull_image(&reference).await.map_err(|source| OrchestratorError::NodeStartFailed {
                    node: self.name().to_string(),
                    source,
                })?;
                start_container(
                    &n.ctx,
                    network_id,
                    self.name(),
                    &reference,
                    n.store.port,
                    n.store.internal_port,
                    &n.store.env,
                )
                .await
            }
        }
    }

    /// Block until the node is observably serving, or until its readiness
    /// budget is exhausted.
    pub async fn is_ready(&self) -> Result<(), OrchestratorError> {
        let ctx = match self {
            Node::Service(n) => &n.ctx,
            Node::DataStore(n) => &n.ctx,
        };
        probe_readiness(ctx, self.name(), self.host_port()).await
    }
}

async fn start_container(
    ctx: &NodeContext,
    network_id: &str,
    node_name: &str,
    image: &str,
    port: Option<u16>,
    internal_port: Option<u16>,
    env: &[String],
) -> Result<String, OrchestratorError> {
    let spec = ContainerSpec {
        name: container_name(&ctx.app_name, node_name),
        image: image.to_string(),
        env: env.to_vec(),
        port: match (port, internal_port) {
            (Some(host_port), Some(internal_port)) => Some(PortBinding { host_port, internal_port }),
            _ => None,
        },
        network: NetworkAttachment {
            network_id: network_id.to_string(),
            alias: node_name.to_string(),
        },
    };

    let id = ctx
        .engine
        .create_container(spec)
        .await
        .map_err(|source| OrchestratorError::NodeStartFailed { node: node_name.to_string(), source })?;

    ctx.engine
        .start_container(&id)
        .await
        .map_err(|source| OrchestratorError::NodeStartFailed { node: node_name.to_string(), source })?;

    ctx.ledger.add(&ctx.app_name, ResourceType::Container, &id, node_name)?;
    emit(&ctx.log_sink, node_name, format!("started container {id}")).await;
    Ok(id)
}

async fn probe_readiness(ctx: &NodeContext, node_name: &str, port: Option<u16>) -> Result<(), OrchestratorError> {
    let Some(port) = port else {
        return Ok(());
    };
    emit(&ctx.log_sink, node_name, format!("waiting for localhost:{port} to accept connections")).await;
    wait_until_ready(port, ctx.readiness)
        .await
        .map_err(|_| OrchestratorError::TimedOut {
            node: node_name.to_string(),
            timeout_secs: ctx.readiness.overall_timeout.as_secs(),
        })?;
    emit(&ctx.log_sink, node_name, "ready").await;
    Ok(())
}

/// The deterministic image tag a built (non-`image:`) service will carry
/// once `Build` has run — exposed so `inspect`/status reporting and the
/// build RPC agree on the name without re-deriving it.
pub fn built_image_tag(app_name: &str, service_name: &str) -> String {
    image_tag(app_name, service_name)
}
