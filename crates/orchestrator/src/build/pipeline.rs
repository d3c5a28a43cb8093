//! Drive one `build_image` call to completion, relaying `stream` events as
//! log lines and deferring the terminal `error` frame until the stream is
//! drained so diagnostic output already in flight is never swallowed.

use crate::error::OrchestratorError;
use crate::log_line::{emit, LogSink};
use forge_engine::context::stream_build_context;
use forge_engine::types::BuildOptions;
use forge_engine::ContainerEngine;
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;

pub async fn build_from_dir(
    engine: &Arc<dyn ContainerEngine>,
    context_root: &Path,
    tag: &str,
    service_name: &str,
    log_sink: &LogSink,
) -> Result<(), OrchestratorError> {
    let context = stream_build_context(context_root.to_path_buf());
    let opts = BuildOptions { tag: tag.to_string(), labels: Default::default() };

    let mut events = engine
        .build_image(context, opts)
        .await
        .map_err(OrchestratorError::Engine)?;

    let mut terminal_error: Option<String> = None;
    while let Some(event) = events.next().await {
        let event = event.map_err(OrchestratorError::Engine)?;
        if let Some(line) = event.stream {
            emit(log_sink, service_name, line.trim_end()).await;
        }
        if let Some(error) = event.error {
            terminal_error = Some(error);
        }
    }

    match terminal_error {
        Some(message) => Err(OrchestratorError::Internal(format!("build failed: {message}"))),
        None => Ok(()),
    }
}
