//! `forge` command-line surface (§6). One flag is shared by every
//! manifest-driven subcommand: `-f/--file`, defaulting to `forge.yaml` in
//! the current directory.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forge", version, about = "Local multi-service development environment orchestrator")]
pub struct Cli {
    /// Path to the application manifest.
    #[arg(short = 'f', long = "file", global = true, default_value = "forge.yaml")]
    pub file: PathBuf,

    /// Enable info-level logging (overridden by `RUST_LOG` if set).
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Materialize the application described by the manifest.
    Up,
    /// Tear down an application's containers and network.
    Down {
        /// Defaults to the `appName` in the manifest.
        app_name: Option<String>,
    },
    /// Build (or rebuild) one or more services' images without starting them.
    Build {
        /// Services to build; every buildable service if empty.
        services: Vec<String>,
    },
    /// List every resource known to the ledger, or one application's.
    Ps {
        app_name: Option<String>,
    },
    /// Alias of `ps`.
    Inspect {
        app_name: Option<String>,
    },
    /// Stream a running application's logs.
    Logs {
        app_name: String,
        service_name: Option<String>,
        /// Keep streaming until interrupted.
        #[arg(short = 'f', long)]
        follow: bool,
        /// Summarize the collected log output via the external AI collaborator.
        #[arg(long)]
        ai: bool,
        /// Write the raw log output to a file in addition to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run a command inside a running service's container.
    Exec {
        app_name: String,
        service_name: String,
        /// Keep stdin open.
        #[arg(short = 'i', long)]
        interactive: bool,
        /// Allocate a pseudo-TTY.
        #[arg(short = 't', long)]
        tty: bool,
        /// The command to run, e.g. `-- sh -c 'echo hi'`.
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
    /// Tear down and re-apply an application.
    Restart {
        app_name: Option<String>,
        /// Proceed with Apply even if Down fails.
        #[arg(short = 'f', long)]
        force: bool,
    },
    /// Manage the background daemon.
    System {
        #[command(subcommand)]
        command: SystemCommand,
    },
    /// Print the client version.
    Version,
}

#[derive(Subcommand)]
pub enum SystemCommand {
    /// Start the daemon if it isn't already running.
    Start,
    /// Stop the daemon.
    Stop,
    /// Report whether the daemon is reachable.
    Status,
}
