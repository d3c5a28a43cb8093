//! Client dispatcher (C8): the client's only nontrivial responsibility
//! beyond forwarding RPCs is auto-starting the daemon when the well-known
//! endpoint isn't reachable.

use crate::error::ClientError;
use forge_proto::forge_client::ForgeClient;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tonic::transport::Channel;

pub struct DaemonClient {
    pub inner: ForgeClient<Channel>,
}

impl DaemonClient {
    /// Connect without attempting to start the daemon.
    pub async fn connect() -> Result<Self, ClientError> {
        let addr = forge_daemon::env::daemon_addr();
        let endpoint = format!("http://{addr}");
        let channel = Channel::from_shared(endpoint.clone())
            .map_err(|e| ClientError::Unreachable(e.to_string()))?
            .connect_timeout(forge_daemon::env::ipc_timeout())
            .connect()
            .await
            .map_err(|_| ClientError::Unreachable(addr))?;
        Ok(DaemonClient { inner: ForgeClient::new(channel) })
    }

    /// Connect, auto-starting the daemon if it isn't reachable (§4.8):
    /// locate `forged` on PATH or alongside this executable, launch it
    /// detached with stdout/stderr redirected to `<home>/.forge/forged.log`,
    /// then probe the endpoint every second up to 5 times before giving up.
    pub async fn connect_or_start() -> Result<Self, ClientError> {
        if let Ok(client) = Self::connect().await {
            return Ok(client);
        }

        spawn_daemon()?;

        for _ in 0..5 {
            tokio::time::sleep(Duration::from_secs(1)).await;
            if let Ok(client) = Self::connect().await {
                return Ok(client);
            }
        }

        Err(ClientError::Unreachable(forge_daemon::env::daemon_addr()))
    }
}

fn spawn_daemon() -> Result<(), ClientError> {
    let binary = find_daemon_binary()?;
    let mut command = std::process::Command::new(binary);

    match forge_daemon::env::log_path() {
        Some(log_path) => {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let log_file = std::fs::OpenOptions::new().create(true).append(true).open(&log_path)?;
            command.stdout(Stdio::from(log_file.try_clone()?));
            command.stderr(Stdio::from(log_file));
        }
        None => {
            command.stdout(Stdio::null());
            command.stderr(Stdio::null());
        }
    }
    command.stdin(Stdio::null());
    command.spawn()?;
    Ok(())
}

fn find_daemon_binary() -> Result<PathBuf, ClientError> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("forged");
            if sibling.exists() {
                return Ok(sibling);
            }
        }
    }

    std::env::var_os("PATH")
        .into_iter()
        .flat_map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
        .map(|dir| dir.join("forged"))
        .find(|p| p.exists())
        .ok_or(ClientError::BinaryNotFound)
}
