//! `forge ps` / `forge inspect` — render the ledger's view of an
//! application (or every application) reconciled against live engine
//! state (§4.7 Inspect, S4).

use crate::client::DaemonClient;
use crate::error::ExitError;

pub async fn run(app_name: Option<String>) -> Result<(), ExitError> {
    let client = DaemonClient::connect_or_start().await?;
    let mut inner = client.inner;
    let request = forge_proto::InspectRequest { app_name };
    let response = inner.inspect(request).await?.into_inner();

    if response.services.is_empty() {
        println!("No resources found.");
        return Ok(());
    }

    let app_w = response.services.iter().map(|s| s.app_name.len()).max().unwrap_or(0).max("APPLICATION".len());
    let svc_w = response.services.iter().map(|s| s.service_name.len()).max().unwrap_or(0).max("SERVICE".len());
    let typ_w = response.services.iter().map(|s| s.resource_type.len()).max().unwrap_or(0).max("TYPE".len());
    let status_w = response.services.iter().map(|s| s.status.len()).max().unwrap_or(0).max("STATUS".len());

    println!(
        "{:<app_w$}  {:<svc_w$}  {:<typ_w$}  {:<status_w$}  PORTS",
        "APPLICATION", "SERVICE", "TYPE", "STATUS"
    );
    for s in &response.services {
        let ports = s
            .ports
            .iter()
            .map(|p| format!("{}->{}", p.host_port, p.internal_port))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<app_w$}  {:<svc_w$}  {:<typ_w$}  {:<status_w$}  {}",
            s.app_name,
            s.service_name,
            s.resource_type,
            s.status,
            if ports.is_empty() { "-".to_string() } else { ports }
        );
    }

    Ok(())
}
