//! `forge up` — apply the manifest in the current directory (§6, S1).

use crate::client::DaemonClient;
use crate::error::ExitError;
use futures::StreamExt;
use std::path::Path;

pub async fn run(manifest_path: &Path) -> Result<(), ExitError> {
    let (_manifest, config_content) = crate::manifest::load(manifest_path)?;

    let client = DaemonClient::connect_or_start().await?;
    let mut inner = client.inner;
    let request = forge_proto::ApplyRequest { config_content };
    let mut stream = inner.apply(request).await?.into_inner();

    while let Some(entry) = stream.next().await {
        let entry = entry?;
        println!("[{}] {}", entry.service_name, entry.message);
    }

    Ok(())
}
