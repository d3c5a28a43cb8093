//! Centralized environment variable access for the daemon.

use std::path::PathBuf;
use std::time::Duration;

/// `localhost:9001` unless overridden.
pub fn daemon_addr() -> String {
    std::env::var("FORGE_DAEMON_ADDR").unwrap_or_else(|_| "127.0.0.1:9001".to_string())
}

/// `<home>/.forge` unless `FORGE_STATE_DIR` is set.
pub fn state_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("FORGE_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|home| home.join(".forge"))
}

pub fn ledger_path() -> Option<PathBuf> {
    state_dir().map(|dir| dir.join("forge.db"))
}

pub fn log_path() -> Option<PathBuf> {
    state_dir().map(|dir| dir.join("forged.log"))
}

/// Per-RPC IPC timeout the client side uses when probing the daemon;
/// re-exported here so both binaries read the same variable.
pub fn ipc_timeout() -> Duration {
    std::env::var("FORGE_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Overall per-node readiness budget. The source hard-codes this at 60s;
/// elevating it to an env-configurable field lets integration tests drive
/// the readiness-timeout scenario without waiting a full minute.
pub fn readiness_timeout() -> Duration {
    std::env::var("FORGE_READINESS_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(60))
}
