//! Wire-agnostic shapes the orchestrator exchanges with the adapter.
//!
//! These are deliberately not the bollard types: the adapter translates at
//! the boundary so the rest of the core never takes a dependency on the
//! engine crate's request/response shapes.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A host<->container port mapping, both sides required: the orchestrator
/// always knows the internal port up front (the manifest requires it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortBinding {
    pub host_port: u16,
    pub internal_port: u16,
}

/// How a container attaches to the application's network.
#[derive(Debug, Clone)]
pub struct NetworkAttachment {
    pub network_id: String,
    /// The logical node name, used as the network alias so sibling
    /// containers can resolve this one by name.
    pub alias: String,
}

#[derive(Debug, Clone)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub env: Vec<String>,
    pub port: Option<PortBinding>,
    pub network: NetworkAttachment,
}

#[derive(Debug, Clone)]
pub struct InspectResult {
    pub running: bool,
    pub exit_code: Option<i64>,
    pub started_at: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub port_bindings: Vec<PortBinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// One chunk of container output, already attributed to a stream. Not
/// necessarily line-aligned at the adapter boundary — [`crate::logs`]
/// re-chunks on `\n` before handing lines to the orchestrator.
#[derive(Debug, Clone)]
pub struct LogFrame {
    pub stream: StreamKind,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub follow: bool,
    pub stdout: bool,
    pub stderr: bool,
    pub tail: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExecSetup {
    pub cmd: Vec<String>,
    pub tty: bool,
    pub attach_stdin: bool,
    pub attach_stdout: bool,
    pub attach_stderr: bool,
}

/// Raw frames from the engine's multiplexed build response.
#[derive(Debug, Clone)]
pub struct BuildEvent {
    /// Non-empty for a log line the engine wants echoed verbatim.
    pub stream: Option<String>,
    /// Set only on the terminal failure frame.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub tag: String,
    pub labels: HashMap<String, String>,
}
