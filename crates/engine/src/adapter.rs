use crate::error::EngineError;
use crate::types::{
    BuildEvent, BuildOptions, ContainerSpec, ExecSetup, InspectResult, LogFrame, LogOptions,
};
use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::io::{AsyncRead, AsyncWrite};

/// Narrow facade over the container engine. Every method distinguishes
/// "not found" ([`EngineError::NotFound`]) from a generic failure, because
/// the lifecycle driver must be idempotent on "not found" during teardown.
///
/// Implemented against the local Docker Engine API by [`crate::docker::DockerEngine`];
/// the trait boundary exists so the orchestrator can be driven in tests
/// against [`crate::fake::FakeEngine`] without a live daemon.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Pull `reference`, blocking until complete. Progress events are
    /// discarded by the core; only success/failure is observed.
    async fn pull_image(&self, reference: &str) -> Result<(), EngineError>;

    /// Stream a build context (an uncompressed tar archive) into the
    /// engine, returning the interleaved build event stream.
    async fn build_image(
        &self,
        context: BoxStream<'static, std::io::Result<Vec<u8>>>,
        opts: BuildOptions,
    ) -> Result<BoxStream<'static, Result<BuildEvent, EngineError>>, EngineError>;

    async fn create_container(&self, spec: ContainerSpec) -> Result<String, EngineError>;
    async fn start_container(&self, id: &str) -> Result<(), EngineError>;
    async fn stop_container(&self, id: &str, timeout_secs: i64) -> Result<(), EngineError>;
    async fn remove_container(&self, id: &str, force: bool) -> Result<(), EngineError>;

    async fn create_network(&self, name: &str) -> Result<String, EngineError>;
    async fn remove_network(&self, id: &str) -> Result<(), EngineError>;

    async fn inspect_container(&self, id: &str) -> Result<InspectResult, EngineError>;

    async fn container_logs(
        &self,
        id: &str,
        opts: LogOptions,
    ) -> Result<BoxStream<'static, Result<LogFrame, EngineError>>, EngineError>;

    async fn exec_create(&self, id: &str, setup: ExecSetup) -> Result<String, EngineError>;

    /// Attach to a previously created exec session, returning independent
    /// read/write halves: writes go to the session's stdin, reads drain
    /// its combined stdout/stderr.
    async fn exec_attach(
        &self,
        exec_id: &str,
    ) -> Result<(Box<dyn AsyncWrite + Unpin + Send>, Box<dyn AsyncRead + Unpin + Send>), EngineError>;
}
