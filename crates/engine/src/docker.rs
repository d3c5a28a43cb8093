//! [`ContainerEngine`] implemented against the local Docker Engine API.

use crate::adapter::ContainerEngine;
use crate::error::EngineError;
use crate::logs::demux_to_lines;
use crate::types::{
    BuildEvent, BuildOptions, ContainerSpec, ExecSetup, InspectResult, LogFrame, LogOptions,
    PortBinding,
};
use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, LogsOptions, NetworkingConfig,
    RemoveContainerOptions, StartContainerOptions, StopContainerOptions,
};
use bollard::exec::{CreateExecOptions, StartExecOptions, StartExecResults};
use bollard::image::{BuildImageOptions, CreateImageOptions};
use bollard::models::{EndpointSettings, HostConfig, PortBinding as BollardPortBinding};
use bollard::network::{CreateNetworkOptions, RemoveNetworkOptions};
use bollard::Docker;
use futures::stream::{self, BoxStream, StreamExt};
use hyper::Body;
use std::collections::HashMap;

pub struct DockerEngine {
    docker: Docker,
}

impl DockerEngine {
    /// Connect using the platform default (unix socket on Linux/macOS,
    /// named pipe on Windows), honoring `DOCKER_HOST` if set.
    pub fn connect() -> Result<Self, EngineError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;
        Ok(DockerEngine { docker })
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn pull_image(&self, reference: &str) -> Result<(), EngineError> {
        let options = CreateImageOptions {
            from_image: reference.to_string(),
            ..Default::default()
        };
        let mut stream = self.docker.create_image(Some(options), None, None);
        while let Some(event) = stream.next().await {
            event?;
        }
        Ok(())
    }

    async fn build_image(
        &self,
        context: BoxStream<'static, std::io::Result<Vec<u8>>>,
        opts: BuildOptions,
    ) -> Result<BoxStream<'static, Result<BuildEvent, EngineError>>, EngineError> {
        let options = BuildImageOptions {
            t: opts.tag,
            rm: true,
            ..Default::default()
        };
        let body = Body::wrap_stream(context);
        let events = self
            .docker
            .build_image(options, None, Some(body))
            .map(|item| match item {
                Ok(info) => Ok(BuildEvent {
                    stream: info.stream,
                    error: info
                        .error
                        .or_else(|| info.error_detail.and_then(|d| d.message)),
                }),
                Err(e) => Err(EngineError::from(e)),
            });
        Ok(events.boxed())
    }

    async fn create_container(&self, spec: ContainerSpec) -> Result<String, EngineError> {
        let mut endpoints = HashMap::new();
        endpoints.insert(
            spec.network.network_id.clone(),
            EndpointSettings {
                aliases: Some(vec![spec.network.alias.clone()]),
                ..Default::default()
            },
        );

        let mut exposed_ports = HashMap::new();
        let mut port_bindings: HashMap<String, Option<Vec<BollardPortBinding>>> = HashMap::new();
        if let Some(PortBinding { host_port, internal_port }) = spec.port {
            let key = format!("{internal_port}/tcp");
            exposed_ports.insert(key.clone(), HashMap::new());
            port_bindings.insert(
                key,
                Some(vec![BollardPortBinding {
                    host_ip: Some("0.0.0.0".to_string()),
                    host_port: Some(host_port.to_string()),
                }]),
            );
        }

        let config = Config {
            image: Some(spec.image.clone()),
            env: Some(spec.env.clone()),
            exposed_ports: Some(exposed_ports),
            host_config: Some(HostConfig {
                port_bindings: Some(port_bindings),
                ..Default::default()
            }),
            networking_config: Some(NetworkingConfig {
                endpoints_config: endpoints,
            }),
            ..Default::default()
        };
        let options = CreateContainerOptions {
            name: spec.name.clone(),
            platform: None,
        };
        let result = self.docker.create_container(Some(options), config).await?;
        Ok(result.id)
    }

    async fn start_container(&self, id: &str) -> Result<(), EngineError> {
        self.docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    async fn stop_container(&self, id: &str, timeout_secs: i64) -> Result<(), EngineError> {
        let options = StopContainerOptions { t: timeout_secs };
        self.docker.stop_container(id, Some(options)).await?;
        Ok(())
    }

    async fn remove_container(&self, id: &str, force: bool) -> Result<(), EngineError> {
        let options = RemoveContainerOptions {
            force,
            v: true,
            ..Default::default()
        };
        self.docker.remove_container(id, Some(options)).await?;
        Ok(())
    }

    async fn create_network(&self, name: &str) -> Result<String, EngineError> {
        let options = CreateNetworkOptions {
            name: name.to_string(),
            driver: "bridge".to_string(),
            ..Default::default()
        };
        let result = self.docker.create_network(options).await?;
        result.id.ok_or_else(|| EngineError::Internal("network created without an id".into()))
    }

    async fn remove_network(&self, id: &str) -> Result<(), EngineError> {
        self.docker.remove_network(id).await.map_err(EngineError::from)
    }

    async fn inspect_container(&self, id: &str) -> Result<InspectResult, EngineError> {
        let options = InspectContainerOptions { size: false };
        let inspect = self.docker.inspect_container(id, Some(options)).await?;

        let state = inspect.state.unwrap_or_default();
        let port_bindings = inspect
            .network_settings
            .and_then(|ns| ns.ports)
            .map(|ports| {
                ports
                    .into_iter()
                    .filter_map(|(key, bindings)| {
                        let internal_port: u16 = key.split('/').next()?.parse().ok()?;
                        let host_port: u16 = bindings?
                            .first()?
                            .host_port
                            .as_ref()?
                            .parse()
                            .ok()?;
                        Some(PortBinding { host_port, internal_port })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(InspectResult {
            running: state.running.unwrap_or(false),
            exit_code: state.exit_code,
            started_at: state.started_at.and_then(|s| s.parse().ok()),
            created: inspect.created.and_then(|s| s.parse().ok()),
            port_bindings,
        })
    }

    async fn container_logs(
        &self,
        id: &str,
        opts: LogOptions,
    ) -> Result<BoxStream<'static, Result<LogFrame, EngineError>>, EngineError> {
        let options = LogsOptions::<String> {
            follow: opts.follow,
            stdout: opts.stdout,
            stderr: opts.stderr,
            tail: opts.tail.unwrap_or_else(|| "all".to_string()),
            ..Default::default()
        };
        let raw = self.docker.logs(id, Some(options));
        Ok(demux_to_lines(raw.boxed()))
    }

    async fn exec_create(&self, id: &str, setup: ExecSetup) -> Result<String, EngineError> {
        let options = CreateExecOptions {
            cmd: Some(setup.cmd.clone()),
            attach_stdin: Some(setup.attach_stdin),
            attach_stdout: Some(setup.attach_stdout),
            attach_stderr: Some(setup.attach_stderr),
            tty: Some(setup.tty),
            ..Default::default()
        };
        let result = self.docker.create_exec(id, options).await?;
        Ok(result.id)
    }

    async fn exec_attach(
        &self,
        exec_id: &str,
    ) -> Result<
        (
            Box<dyn tokio::io::AsyncWrite + Unpin + Send>,
            Box<dyn tokio::io::AsyncRead + Unpin + Send>,
        ),
        EngineError,
    > {
        let options = StartExecOptions {
            detach: false,
            ..Default::default()
        };
        match self.docker.start_exec(exec_id, Some(options)).await? {
            StartExecResults::Attached { input, output } => {
                let reader = tokio_util::io::StreamReader::new(output.map(|item| {
                    item.map(|log| bytes::Bytes::from(log.into_bytes()))
                        .map_err(std::io::Error::other)
                }));
                Ok((input, Box::new(reader)))
            }
            StartExecResults::Detached => Err(EngineError::Internal(
                "exec session started detached unexpectedly".into(),
            )),
        }
    }
}

/// Helper kept for callers that want an empty build context stream (e.g.
/// building from a pre-pulled image where no context is needed).
pub fn empty_context() -> BoxStream<'static, std::io::Result<Vec<u8>>> {
    stream::empty().boxed()
}
