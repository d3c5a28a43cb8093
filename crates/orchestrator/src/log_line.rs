/// One log line attributed to a service, the shape every streaming RPC
/// (`Apply`, `Build`, `FetchLogs`) forwards to its response stream. Kept
/// free of any `tonic`/`prost` dependency so this crate stays engine- and
/// transport-agnostic; the daemon converts these into `LogEntry` at the
/// RPC boundary.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub service_name: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub message: String,
}

impl LogLine {
    pub fn new(service_name: impl Into<String>, message: impl Into<String>) -> Self {
        LogLine {
            service_name: service_name.into(),
            timestamp: chrono::Utc::now(),
            message: message.into(),
        }
    }
}

/// Where a node/build/log-fan-in step sends its output. `None` is a valid
/// sink for calls made outside an RPC context (e.g. tests).
pub type LogSink = Option<tokio::sync::mpsc::Sender<LogLine>>;

pub async fn emit(sink: &LogSink, service_name: &str, message: impl Into<String>) {
    if let Some(tx) = sink {
        let _ = tx.send(LogLine::new(service_name, message)).await;
    }
}
