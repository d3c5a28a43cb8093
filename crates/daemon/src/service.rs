//! The daemon's RPC surface: a thin `tonic` service that translates
//! wire messages into orchestrator calls and back. No orchestration logic
//! lives here — this is the boundary that owns cancellation wiring, log
//! fan-in plumbing, and error-kind-to-status-code mapping.

use crate::env;
use crate::error::to_status;
use forge_engine::types::ExecSetup as EngineExecSetup;
use forge_engine::{ContainerEngine, DockerEngine};
use forge_ledger::Ledger;
use forge_orchestrator::{LogLine, Orchestrator, ReadinessConfig};
use forge_proto::exec_message::Payload;
use forge_proto::forge_server::Forge;
use forge_proto::{
    ApplyRequest, BuildRequest, ExecMessage, FetchLogsRequest, InspectRequest, InspectResponse,
    LogEntry, PortMapping, ServiceStatus as WireServiceStatus, TeardownRequest, TeardownResponse,
};
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};

pub struct ForgeService {
    pub engine: Arc<dyn ContainerEngine>,
    pub ledger: Arc<Ledger>,
}

impl ForgeService {
    pub fn new() -> Result<Self, Status> {
        let engine = DockerEngine::connect().map_err(|e| Status::unavailable(e.to_string()))?;
        let ledger_path = env::ledger_path()
            .ok_or_else(|| Status::internal("could not determine a home directory for the ledger"))?;
        let ledger = Ledger::open(&ledger_path).map_err(|e| Status::internal(e.to_string()))?;
        Ok(ForgeService { engine: Arc::new(engine), ledger: Arc::new(ledger) })
    }

    fn orchestrator(&self, app_name: &str) -> Orchestrator {
        Orchestrator::new(app_name.to_string(), Arc::clone(&self.engine), Arc::clone(&self.ledger))
    }

    fn readiness(&self) -> ReadinessConfig {
        ReadinessConfig { overall_timeout: env::readiness_timeout(), ..ReadinessConfig::default() }
    }
}

type LogStream = Pin<Box<dyn Stream<Item = Result<LogEntry, Status>> + Send + 'static>>;
type ExecStream = Pin<Box<dyn Stream<Item = Result<ExecMessage, Status>> + Send + 'static>>;

fn wire_log_entry(line: LogLine) -> LogEntry {
    LogEntry {
        service_name: line.service_name,
        timestamp: line.timestamp.to_rfc3339(),
        message: line.message,
    }
}

/// Bridge an `mpsc::Receiver<LogLine>` into the `LogEntry` stream shape
/// the generated trait expects, converting as items arrive.
fn log_stream_from(rx: mpsc::Receiver<LogLine>) -> LogStream {
    use futures::StreamExt;
    Box::pin(ReceiverStream::new(rx).map(|line| Ok(wire_log_entry(line))))
}

#[tonic::async_trait]
impl Forge for ForgeService {
    type ApplyStream = LogStream;

    #[tracing::instrument(skip_all)]
    async fn apply(&self, request: Request<ApplyRequest>) -> Result<Response<Self::ApplyStream>, Status> {
        let manifest = forge_manifest::parse(&request.into_inner().config_content)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;
        forge_manifest::validate(&manifest).map_err(|e| Status::invalid_argument(e.to_string()))?;

        let (tx, mut rx) = mpsc::channel(64);
        let orchestrator = self.orchestrator(&manifest.app_name);
        let readiness = self.readiness();

        let handle = tokio::spawn(async move { orchestrator.up(&manifest, Some(tx), readiness).await });

        let stream = async_stream::stream! {
            while let Some(line) = rx.recv().await {
                yield Ok(wire_log_entry(line));
            }
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => yield Err(to_status(e)),
                Err(join_err) => yield Err(Status::internal(join_err.to_string())),
            }
        };

        Ok(Response::new(Box::pin(stream)))
    }

    async fn teardown(&self, request: Request<TeardownRequest>) -> Result<Response<TeardownResponse>, Status> {
        let req = request.into_inner();
        let orchestrator = self.orchestrator(&req.app_name);
        match orchestrator.down().await {
            Ok(()) => Ok(Response::new(TeardownResponse {
                message: format!("application '{}' torn down", req.app_name),
            })),
            Err(e) if req.force => {
                tracing::warn!(app = %req.app_name, error = %e, "teardown failed, --force requested");
                Ok(Response::new(TeardownResponse { message: e.to_string() }))
            }
            Err(e) => Err(to_status(e)),
        }
    }

    async fn inspect(&self, request: Request<InspectRequest>) -> Result<Response<InspectResponse>, Status> {
        let app_filter = request.into_inner().app_name;
        let resources = match &app_filter {
            Some(name) => self.ledger.list_by_app(name),
            None => self.ledger.list_all(),
        };

        let mut services = Vec::with_capacity(resources.len());
        for resource in resources {
            let status = forge_orchestrator::resource_status(&self.engine, &resource).await;
            services.push(WireServiceStatus {
                app_name: status.app_name,
                service_name: status.service_name,
                resource_type: status.resource_type.as_str().to_string(),
                resource_id: status.resource_id,
                created: status.created.map(|t| t.to_rfc3339()).unwrap_or_default(),
                status: status.status,
                ports: status
                    .ports
                    .into_iter()
                    .map(|(host_port, internal_port)| PortMapping {
                        host_port: host_port as u32,
                        internal_port: internal_port as u32,
                    })
                    .collect(),
            });
        }

        Ok(Response::new(InspectResponse { services }))
    }

    type FetchLogsStream = LogStream;

    async fn fetch_logs(&self, request: Request<FetchLogsRequest>) -> Result<Response<Self::FetchLogsStream>, Status> {
        let req = request.into_inner();
        let orchestrator = self.orchestrator(&req.app_name);
        let (tx, rx) = mpsc::channel(64);
        let cancel = tokio_util::sync::CancellationToken::new();

        tokio::spawn(async move {
            let _ = orchestrator
                .logs_fan_in(req.service_name.as_deref(), req.follow, tx, cancel)
                .await;
        });

        Ok(Response::new(log_stream_from(rx)))
    }

    type BuildStream = LogStream;

    async fn build(&self, request: Request<BuildRequest>) -> Result<Response<Self::BuildStream>, Status> {
        let req = request.into_inner();
        let manifest = forge_manifest::parse(&req.config_content)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;
        forge_manifest::validate(&manifest).map_err(|e| Status::invalid_argument(e.to_string()))?;

        let (tx, mut rx) = mpsc::channel(64);
        let orchestrator = self.orchestrator(&manifest.app_name);

        let handle =
            tokio::spawn(async move { orchestrator.build(&manifest, &req.services_name, Some(tx)).await });

        let stream = async_stream::stream! {
            while let Some(line) = rx.recv().await {
                yield Ok(wire_log_entry(line));
            }
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => yield Err(to_status(e)),
                Err(join_err) => yield Err(Status::internal(join_err.to_string())),
            }
        };

        Ok(Response::new(Box::pin(stream)))
    }

    type ExecStream = ExecStream;

    async fn exec(&self, request: Request<Streaming<ExecMessage>>) -> Result<Response<Self::ExecStream>, Status> {
        use futures::StreamExt;
        let mut inbound = request.into_inner();

        let first = inbound
            .next()
            .await
            .ok_or_else(|| Status::invalid_argument("exec stream closed before setup"))?
            .map_err(|e| Status::invalid_argument(e.to_string()))?;
        let setup = match first.payload {
            Some(Payload::Setup(setup)) => setup,
            _ => return Err(Status::invalid_argument("first exec message must be a Setup envelope")),
        };

        let (stdin_tx, stdin_rx) = mpsc::channel::<Vec<u8>>(64);
        let (stdout_tx, stdout_rx) = mpsc::channel::<Vec<u8>>(64);
        let cancel = tokio_util::sync::CancellationToken::new();

        let orchestrator = self.orchestrator(&setup.app_name);
        let engine_setup = EngineExecSetup {
            cmd: setup.command.clone(),
            tty: setup.tty,
            attach_stdin: true,
            attach_stdout: true,
            attach_stderr: true,
        };
        let service_name = setup.service_name.clone();
        let session_cancel = cancel.clone();
        tokio::spawn(async move {
            let _ = orchestrator
                .exec_session(&service_name, engine_setup, stdin_rx, stdout_tx, session_cancel)
                .await;
        });

        tokio::spawn(async move {
            while let Some(Ok(message)) = inbound.next().await {
                match message.payload {
                    Some(Payload::Stdin(bytes)) => {
                        if stdin_tx.send(bytes).await.is_err() {
                            break;
                        }
                    }
                    _ => break,
                }
            }
            cancel.cancel();
        });

        let out = ReceiverStream::new(stdout_rx).map(|bytes| Ok(ExecMessage { payload: Some(Payload::StdoutStderr(bytes)) }));
        Ok(Response::new(Box::pin(out)))
    }
}
