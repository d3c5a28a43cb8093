pub mod env;
mod error;
mod service;

pub use service::ForgeService;

use forge_proto::forge_server::ForgeServer;
use std::net::SocketAddr;
use tonic::transport::Server;

/// Bind and serve the control plane until the process is asked to stop.
/// `shutdown` resolving ends the server gracefully, letting in-flight
/// streaming RPCs drain rather than hard-dropping connections.
pub async fn serve(addr: SocketAddr, shutdown: impl std::future::Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
    let service = ForgeService::new().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!(%addr, "forge daemon listening");
    Server::builder()
        .add_service(ForgeServer::new(service))
        .serve_with_shutdown(addr, shutdown)
        .await?;
    Ok(())
}
