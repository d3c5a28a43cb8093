//! `forge restart` — Down followed by Apply (§4.4 Restart). There is no
//! dedicated Restart RPC (§6); the client composes the two calls it
//! already has, matching how the core defines restart as their sequence.

use crate::client::DaemonClient;
use crate::error::ExitError;
use futures::StreamExt;
use std::path::Path;

pub async fn run(manifest_path: &Path, app_name: Option<String>, force: bool) -> Result<(), ExitError> {
    let (manifest, config_content) = crate::manifest::load(manifest_path)?;
    let app_name = app_name.unwrap_or_else(|| manifest.app_name.clone());

    let client = DaemonClient::connect_or_start().await?;
    let mut inner = client.inner;

    let teardown = forge_proto::TeardownRequest { app_name: app_name.clone(), force };
    match inner.teardown(teardown).await {
        Ok(response) => println!("{}", response.into_inner().message),
        Err(e) if force => eprintln!("restart: down failed, proceeding with --force: {}", e.message()),
        Err(e) => return Err(e.into()),
    }

    let apply = forge_proto::ApplyRequest { config_content };
    let mut stream = inner.apply(apply).await?.into_inner();
    while let Some(entry) = stream.next().await {
        let entry = entry?;
        println!("[{}] {}", entry.service_name, entry.message);
    }

    Ok(())
}
