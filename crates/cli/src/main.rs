mod ai;
mod cli;
mod client;
mod commands;
mod error;
mod manifest;

use clap::Parser;
use cli::{Cli, Command, SystemCommand};
use error::ExitError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = dispatch(cli).await {
        eprintln!("error: {err}");
        std::process::exit(err.code);
    }
}

async fn dispatch(cli: Cli) -> Result<(), ExitError> {
    match cli.command {
        Command::Up => commands::up::run(&cli.file).await,
        Command::Down { app_name } => commands::down::run(&cli.file, app_name).await,
        Command::Build { services } => commands::build::run(&cli.file, services).await,
        Command::Ps { app_name } | Command::Inspect { app_name } => commands::ps::run(app_name).await,
        Command::Logs { app_name, service_name, follow, ai, output } => {
            commands::logs::run(app_name, service_name, follow, ai, output).await
        }
        Command::Exec { app_name, service_name, interactive, tty, command } => {
            commands::exec::run(app_name, service_name, interactive, tty, command).await
        }
        Command::Restart { app_name, force } => commands::restart::run(&cli.file, app_name, force).await,
        Command::System { command } => match command {
            SystemCommand::Start => commands::system::start().await,
            SystemCommand::Stop => commands::system::stop().await,
            SystemCommand::Status => commands::system::status().await,
        },
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
