//! The per-application object assembled by the RPC layer on each call
//! (C6). Every externally visible operation — Up, Down, Build, Logs,
//! Exec, Status — is a method here; this is the single writer to the
//! ledger during a command.

use crate::build;
use crate::error::OrchestratorError;
use crate::lifecycle;
use crate::log_line::{LogLine, LogSink};
use crate::naming::network_name;
use crate::node::{DataStoreNode, Node, NodeContext};
use crate::readiness::ReadinessConfig;
use crate::status::{resource_status, ServiceStatus};
use forge_engine::types::{ExecSetup, LogOptions};
use forge_engine::ContainerEngine;
use forge_ledger::{Ledger, ResourceType, NETWORK_SERVICE_NAME};
use forge_manifest::graph::topo_order;
use forge_manifest::Manifest;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub struct Orchestrator {
    pub app_name: String,
    pub engine: Arc<dyn ContainerEngine>,
    pub ledger: Arc<Ledger>,
}

impl Orchestrator {
    pub fn new(app_name: impl Into<String>, engine: Arc<dyn ContainerEngine>, ledger: Arc<Ledger>) -> Self {
        Orchestrator { app_name: app_name.into(), engine, ledger }
    }

    fn node_ctx(&self, log_sink: LogSink, readiness: ReadinessConfig) -> NodeContext {
        NodeContext {
            app_name: self.app_name.clone(),
            engine: Arc::clone(&self.engine),
            ledger: Arc::clone(&self.ledger),
            log_sink,
            readiness,
        }
    }

    /// Apply (Up): I3 conflict check, topo sort, fresh per-app network,
    /// then the sequential start-and-probe driver.
    pub async fn up(
        &self,
        manifest: &Manifest,
        log_sink: LogSink,
        readiness: ReadinessConfig,
    ) -> Result<(), OrchestratorError> {
        if self.ledger.has_app(&self.app_name) {
            return Err(OrchestratorError::Conflict(self.app_name.clone()));
        }

        let order = topo_order(&dependency_pairs(manifest))?;
        let nodes = self.build_nodes(manifest, &order, log_sink.clone(), readiness);

        let net_name = network_name(&self.app_name);
        let network_id = self.engine.create_network(&net_name).await?;
        self.ledger
            .add(&self.app_name, ResourceType::Network, &network_id, NETWORK_SERVICE_NAME)?;

        lifecycle::apply(&nodes, &network_id).await
    }

    pub async fn down(&self) -> Result<(), OrchestratorError> {
        lifecycle::teardown(&self.engine, &self.ledger, &self.app_name).await
    }

    pub async fn restart(
        &self,
        manifest: &Manifest,
        force: bool,
        log_sink: LogSink,
        readiness: ReadinessConfig,
    ) -> Result<(), OrchestratorError> {
        let order = topo_order(&dependency_pairs(manifest))?;
        let nodes = self.build_nodes(manifest, &order, log_sink.clone(), readiness);

        match self.down().await {
            Ok(()) => {}
            Err(e) if force => tracing::warn!(app = %self.app_name, error = %e, "restart: down failed, proceeding with --force"),
            Err(e) => return Err(e),
        }

        let net_name = network_name(&self.app_name);
        let network_id = self.engine.create_network(&net_name).await?;
        self.ledger
            .add(&self.app_name, ResourceType::Network, &network_id, NETWORK_SERVICE_NAME)?;

        lifecycle::apply(&nodes, &network_id).await
    }

    /// Build (explicit, not tied to Up): resolve each requested service's
    /// image, pulling or building as its source dictates. Empty
    /// `service_names` means every service in the manifest.
    pub async fn build(
        &self,
        manifest: &Manifest,
        service_names: &[String],
        log_sink: LogSink,
    ) -> Result<(), OrchestratorError> {
        let ctx = self.node_ctx(log_sink, ReadinessConfig::default());
        for service in &manifest.services {
            if !service_names.is_empty() && !service_names.contains(&service.name) {
                continue;
            }
            build::resolve_image(&ctx, service).await?;
        }
        Ok(())
    }

    pub async fn status(&self) -> Vec<ServiceStatus> {
        let resources = self.ledger.list_by_app(&self.app_name);
        let mut statuses = Vec::with_capacity(resources.len());
        for resource in resources {
            statuses.push(resource_status(&self.engine, &resource).await);
        }
        statuses
    }

    /// Fan-in log streaming (§4.7). When `service_name` names a service
    /// that does not belong to this application, sends a single
    /// informational line and completes cleanly rather than failing (T7).
    pub async fn logs_fan_in(
        &self,
        service_name: Option<&str>,
        follow: bool,
        sink: mpsc::Sender<LogLine>,
        cancel: CancellationToken,
    ) -> Result<(), OrchestratorError> {
        let mut containers: Vec<_> = self
            .ledger
            .list_by_app(&self.app_name)
            .into_iter()
            .filter(|r| r.resource_type == ResourceType::Container)
            .collect();

        if let Some(name) = service_name {
            containers.retain(|r| r.service_name == name);
            if containers.is_empty() {
                let _ = sink
                    .send(LogLine::new(
                        name,
                        format!("service '{name}' does not belong to application '{}'", self.app_name),
                    ))
                    .await;
                return Ok(());
            }
        }

        let mut tasks = Vec::with_capacity(containers.len());
        for resource in containers {
            let engine = Arc::clone(&self.engine);
            let sink = sink.clone();
            let cancel = cancel.clone();
            let service_name = resource.service_name.clone();
            let resource_id = resource.resource_id.clone();
            tasks.push(tokio::spawn(async move {
                stream_one_container(&engine, &resource_id, &service_name, follow, sink, cancel).await;
            }));
        }

        for task in tasks {
            let _ = task.await;
        }
        Ok(())
    }

    /// Bidirectional exec (§4.7): copy `stdin_rx` into the session, copy
    /// its combined stdout/stderr into `stdout_tx`. Either direction
    /// finishing (EOF, error, or cancellation) ends the other.
    pub async fn exec_session(
        &self,
        service_name: &str,
        setup: ExecSetup,
        mut stdin_rx: mpsc::Receiver<Vec<u8>>,
        stdout_tx: mpsc::Sender<Vec<u8>>,
        cancel: CancellationToken,
    ) -> Result<(), OrchestratorError> {
        let resource = self
            .ledger
            .list_by_app(&self.app_name)
            .into_iter()
            .find(|r| r.resource_type == ResourceType::Container && r.service_name == service_name)
            .ok_or_else(|| OrchestratorError::NotFound(format!("no running service named '{service_name}'")))?;

        let exec_id = self.engine.exec_create(&resource.resource_id, setup).await?;
        let (mut write_half, mut read_half) = self.engine.exec_attach(&exec_id).await?;

        let write_cancel = cancel.clone();
        let writer = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = write_cancel.cancelled() => break,
                    chunk = stdin_rx.recv() => {
                        match chunk {
                            Some(bytes) => {
                                if write_half.write_all(&bytes).await.is_err() {
                                    break;
                                }
                            }
                            None => break,
                        }
                    }
                }
            }
        });

        let read_cancel = cancel.clone();
        let reader = tokio::spawn(async move {
            let mut buf = [0u8; 4096];
            loop {
                tokio::select! {
                    _ = read_cancel.cancelled() => break,
                    result = read_half.read(&mut buf) => {
                        match result {
                            Ok(0) | Err(_) => break,
                            Ok(n) => {
                                if stdout_tx.send(buf[..n].to_vec()).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        });

        let _ = reader.await;
        cancel.cancel();
        let _ = writer.await;
        Ok(())
    }

    fn build_nodes(
        &self,
        manifest: &Manifest,
        order: &[String],
        log_sink: LogSink,
        readiness: ReadinessConfig,
    ) -> Vec<Node> {
        let mut services: HashMap<String, _> = manifest.services.iter().map(|s| (s.name.clone(), s.clone())).collect();
        let mut stores: HashMap<String, _> = manifest.databases.iter().map(|d| (d.name.clone(), d.clone())).collect();

        order
            .iter()
            .filter_map(|name| {
                if let Some(service) = services.remove(name) {
                    Some(Node::Service(crate::node::ServiceNode {
                        service,
                        ctx: self.node_ctx(log_sink.clone(), readiness),
                    }))
                } else {
                    stores
                        .remove(name)
                        .map(|store| Node::DataStore(DataStoreNode { store, ctx: self.node_ctx(log_sink.clone(), readiness) }))
                }
            })
            .collect()
    }
}

fn dependency_pairs(manifest: &Manifest) -> Vec<(String, Vec<String>)> {
    manifest
        .services
        .iter()
        .map(|s| (s.name.clone(), s.depends_on.clone()))
        .chain(manifest.databases.iter().map(|d| (d.name.clone(), d.depends_on.clone())))
        .collect()
}

async fn stream_one_container(
    engine: &Arc<dyn ContainerEngine>,
    container_id: &str,
    service_name: &str,
    follow: bool,
    sink: mpsc::Sender<LogLine>,
    cancel: CancellationToken,
) {
    let opts = LogOptions { follow, stdout: true, stderr: true, tail: None };
    let mut frames = match engine.container_logs(container_id, opts).await {
        Ok(s) => s,
        Err(e) => {
            let _ = sink.send(LogLine::new(service_name, format!("log stream failed: {e}"))).await;
            return;
        }
    };

    use futures::StreamExt;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            frame = frames.next() => {
                match frame {
                    Some(Ok(frame)) => {
                        let message = String::from_utf8_lossy(&frame.data).trim_end().to_string();
                        if sink.send(LogLine::new(service_name, message)).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        let _ = sink.send(LogLine::new(service_name, format!("log stream error: {e}"))).await;
                        break;
                    }
                    None => break,
                }
            }
        }
    }
}
