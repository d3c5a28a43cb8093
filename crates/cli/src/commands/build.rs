//! `forge build` — resolve one or more services' images without starting
//! them (§4.6 Build, §6). Empty `services` means every buildable service.

use crate::client::DaemonClient;
use crate::error::ExitError;
use futures::StreamExt;
use std::path::Path;

pub async fn run(manifest_path: &Path, services: Vec<String>) -> Result<(), ExitError> {
    let (_manifest, config_content) = crate::manifest::load(manifest_path)?;

    let client = DaemonClient::connect_or_start().await?;
    let mut inner = client.inner;
    let request = forge_proto::BuildRequest { config_content, services_name: services };
    let mut stream = inner.build(request).await?.into_inner();

    while let Some(entry) = stream.next().await {
        let entry = entry?;
        println!("[{}] {}", entry.service_name, entry.message);
    }

    Ok(())
}
