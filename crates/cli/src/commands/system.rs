//! `forge system start|stop|status` (§6, §9). The daemon keeps no PID
//! file — liveness is the listening endpoint, and `stop` falls back to
//! matching the process by name since there is nothing else to key on.

use crate::client::DaemonClient;
use crate::error::ExitError;

pub async fn start() -> Result<(), ExitError> {
    match DaemonClient::connect().await {
        Ok(_) => {
            println!("daemon already running at {}", forge_daemon::env::daemon_addr());
            Ok(())
        }
        Err(_) => {
            DaemonClient::connect_or_start().await?;
            println!("daemon started at {}", forge_daemon::env::daemon_addr());
            Ok(())
        }
    }
}

pub async fn status() -> Result<(), ExitError> {
    match DaemonClient::connect().await {
        Ok(_) => println!("daemon running at {}", forge_daemon::env::daemon_addr()),
        Err(_) => println!("daemon not running"),
    }
    Ok(())
}

pub async fn stop() -> Result<(), ExitError> {
    if DaemonClient::connect().await.is_err() {
        println!("daemon not running");
        return Ok(());
    }

    if !kill_by_name("forged")? {
        return Err(ExitError::failure(
            "daemon is reachable but could not be stopped: no process matching 'forged' was found",
        ));
    }
    println!("daemon stopped");
    Ok(())
}

#[cfg(unix)]
fn kill_by_name(process_name: &str) -> Result<bool, ExitError> {
    let status = std::process::Command::new("pkill").arg("-f").arg(process_name).status()?;
    Ok(status.success())
}

#[cfg(not(unix))]
fn kill_by_name(_process_name: &str) -> Result<bool, ExitError> {
    Ok(false)
}
