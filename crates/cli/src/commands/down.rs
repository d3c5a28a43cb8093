//! `forge down` — tear down an application (§6). `app_name` defaults to
//! the `appName` declared in the manifest in the current directory.

use crate::client::DaemonClient;
use crate::error::ExitError;
use std::path::Path;

pub async fn run(manifest_path: &Path, app_name: Option<String>) -> Result<(), ExitError> {
    let app_name = match app_name {
        Some(name) => name,
        None => crate::manifest::app_name(manifest_path)?,
    };

    let client = DaemonClient::connect_or_start().await?;
    let mut inner = client.inner;
    let request = forge_proto::TeardownRequest { app_name, force: false };
    let response = inner.teardown(request).await?.into_inner();
    println!("{}", response.message);
    Ok(())
}
