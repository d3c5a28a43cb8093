//! `forge logs` — fan-in log streaming (§4.7, S6). `--output` tees the
//! raw stream to a file; `--ai` hands the collected lines to the external
//! AI collaborator (§1) once the stream completes.

use crate::ai;
use crate::client::DaemonClient;
use crate::error::ExitError;
use futures::StreamExt;
use std::io::Write;
use std::path::PathBuf;

pub async fn run(
    app_name: String,
    service_name: Option<String>,
    follow: bool,
    ai_summary: bool,
    output: Option<PathBuf>,
) -> Result<(), ExitError> {
    let client = DaemonClient::connect_or_start().await?;
    let mut inner = client.inner;
    let request = forge_proto::FetchLogsRequest { app_name, service_name, follow };
    let mut stream = inner.fetch_logs(request).await?.into_inner();

    let mut output_file = output.as_ref().map(std::fs::File::create).transpose()?;

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c(), if follow => break,
            entry = stream.next() => {
                let Some(entry) = entry else { break };
                let entry = entry?;
                let line = format!("[{}] {}", entry.service_name, entry.message);
                println!("{line}");
                if let Some(file) = &mut output_file {
                    writeln!(file, "{line}")?;
                }
            }
        }
    }

    if ai_summary {
        println!("{}", ai::note_unimplemented());
    }

    Ok(())
}
