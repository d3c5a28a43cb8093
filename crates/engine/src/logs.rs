//! Re-chunk the engine's multiplexed log stream into complete lines.
//!
//! bollard already demultiplexes stdout/stderr into separate [`LogOutput`]
//! variants; what remains is that a single engine frame rarely lines up
//! with a newline boundary. This buffers per-stream and only yields once a
//! `\n` is seen, so the orchestrator's line-based log fan-in never splits
//! a line across two [`LogFrame`]s.

use crate::error::EngineError;
use crate::types::{LogFrame, StreamKind};
use bollard::container::LogOutput;
use futures::stream::{BoxStream, StreamExt};
use std::collections::HashMap;

pub fn demux_to_lines(
    raw: BoxStream<'static, Result<LogOutput, bollard::errors::Error>>,
) -> BoxStream<'static, Result<LogFrame, EngineError>> {
    let mut buffers: HashMap<StreamKind, Vec<u8>> = HashMap::new();

    async_stream::stream! {
        futures::pin_mut!(raw);
        while let Some(item) = raw.next().await {
            let (kind, bytes) = match item {
                Ok(LogOutput::StdOut { message }) => (StreamKind::Stdout, message),
                Ok(LogOutput::StdErr { message }) => (StreamKind::Stderr, message),
                Ok(LogOutput::Console { message }) => (StreamKind::Stdout, message),
                Ok(LogOutput::StdIn { .. }) => continue,
                Err(e) => {
                    yield Err(EngineError::from(e));
                    continue;
                }
            };

            let buf = buffers.entry(kind).or_default();
            buf.extend_from_slice(&bytes);

            while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                yield Ok(LogFrame { stream: kind, data: line });
            }
        }

        for (kind, buf) in buffers {
            if !buf.is_empty() {
                yield Ok(LogFrame { stream: kind, data: buf });
            }
        }
    }
    .boxed()
}
