//! An in-memory [`ContainerEngine`] used to exercise the orchestrator's
//! lifecycle logic (ordering, error propagation, ledger bookkeeping)
//! without a live Docker daemon. Not compiled into the daemon binary.

use crate::adapter::ContainerEngine;
use crate::error::EngineError;
use crate::types::{
    BuildEvent, BuildOptions, ContainerSpec, ExecSetup, InspectResult, LogFrame, LogOptions,
};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncRead, AsyncWrite};

#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub spec: ContainerSpec,
    pub running: bool,
}

/// Toggle failure injection per call, keyed by a caller-chosen tag (e.g.
/// a node name), so tests can make exactly one node's start fail.
#[derive(Default)]
pub struct FakeEngine {
    next_id: AtomicU64,
    containers: Mutex<HashMap<String, FakeContainer>>,
    networks: Mutex<HashMap<String, String>>,
    /// Node names whose `create_container`/`start_container` should fail.
    pub fail_on_start: Mutex<Vec<String>>,
    /// Host ports that should never accept a readiness probe's simulated
    /// connect — used by orchestrator tests that stub out the TCP dial.
    pub unready_ports: Mutex<Vec<u16>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-{n:x}")
    }

    pub fn containers(&self) -> Vec<FakeContainer> {
        self.containers.lock().values().cloned().collect()
    }
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    async fn pull_image(&self, _reference: &str) -> Result<(), EngineError> {
        Ok(())
    }

    async fn build_image(
        &self,
        _context: BoxStream<'static, std::io::Result<Vec<u8>>>,
        opts: BuildOptions,
    ) -> Result<BoxStream<'static, Result<BuildEvent, EngineError>>, EngineError> {
        let events = vec![
            Ok(BuildEvent {
                stream: Some(format!("Step 1/1 : FROM scratch -> {}\n", opts.tag)),
                error: None,
            }),
            Ok(BuildEvent {
                stream: Some("Successfully built\n".to_string()),
                error: None,
            }),
        ];
        Ok(stream::iter(events).boxed())
    }

    async fn create_container(&self, spec: ContainerSpec) -> Result<String, EngineError> {
        if self.fail_on_start.lock().contains(&spec.network.alias) {
            return Err(EngineError::Transient(format!("simulated failure for {}", spec.network.alias)));
        }
        let id = self.fresh_id("ctr");
        self.containers.lock().insert(
            id.clone(),
            FakeContainer { spec, running: false },
        );
        Ok(id)
    }

    async fn start_container(&self, id: &str) -> Result<(), EngineError> {
        let mut containers = self.containers.lock();
        let container = containers
            .get_mut(id)
            .ok_or_else(|| EngineError::NotFound { kind: "container", id: id.to_string() })?;
        container.running = true;
        Ok(())
    }

    async fn stop_container(&self, id: &str, _timeout_secs: i64) -> Result<(), EngineError> {
        let mut containers = self.containers.lock();
        match containers.get_mut(id) {
            Some(c) => {
                c.running = false;
                Ok(())
            }
            None => Err(EngineError::NotFound { kind: "container", id: id.to_string() }),
        }
    }

    async fn remove_container(&self, id: &str, _force: bool) -> Result<(), EngineError> {
        let mut containers = self.containers.lock();
        if containers.remove(id).is_none() {
            return Err(EngineError::NotFound { kind: "container", id: id.to_string() });
        }
        Ok(())
    }

    async fn create_network(&self, name: &str) -> Result<String, EngineError> {
        let id = self.fresh_id("net");
        self.networks.lock().insert(id.clone(), name.to_string());
        Ok(id)
    }

    async fn remove_network(&self, id: &str) -> Result<(), EngineError> {
        if self.networks.lock().remove(id).is_none() {
            return Err(EngineError::NotFound { kind: "network", id: id.to_string() });
        }
        Ok(())
    }

    async fn inspect_container(&self, id: &str) -> Result<InspectResult, EngineError> {
        let containers = self.containers.lock();
        let container = containers
            .get(id)
            .ok_or_else(|| EngineError::NotFound { kind: "container", id: id.to_string() })?;
        Ok(InspectResult {
            running: container.running,
            exit_code: if container.running { None } else { Some(0) },
            started_at: Some(chrono::Utc::now()),
            created: Some(chrono::Utc::now()),
            port_bindings: container.spec.port.into_iter().collect(),
        })
    }

    async fn container_logs(
        &self,
        _id: &str,
        _opts: LogOptions,
    ) -> Result<BoxStream<'static, Result<LogFrame, EngineError>>, EngineError> {
        Ok(stream::empty().boxed())
    }

    async fn exec_create(&self, _id: &str, _setup: ExecSetup) -> Result<String, EngineError> {
        Ok(self.fresh_id("exec"))
    }

    async fn exec_attach(
        &self,
        _exec_id: &str,
    ) -> Result<(Box<dyn AsyncWrite + Unpin + Send>, Box<dyn AsyncRead + Unpin + Send>), EngineError> {
        Ok((Box::new(tokio::io::sink()), Box::new(tokio::io::empty())))
    }
}
