//! `forge exec` — bidirectional exec (§4.7, §5). Two concurrent
//! directions: one task copies stdin into the session, the main loop
//! copies the session's combined stdout/stderr back to the terminal.
//! Either direction ending (EOF, error, Ctrl-C) ends the other.

use crate::client::DaemonClient;
use crate::error::ExitError;
use forge_proto::exec_message::Payload;
use forge_proto::{ExecMessage, ExecSetup};
use futures::StreamExt;
use std::io::Write;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

pub async fn run(
    app_name: String,
    service_name: String,
    interactive: bool,
    tty: bool,
    command: Vec<String>,
) -> Result<(), ExitError> {
    let client = DaemonClient::connect_or_start().await?;
    let mut inner = client.inner;

    let (tx, rx) = mpsc::channel::<ExecMessage>(64);
    let setup = ExecMessage { payload: Some(Payload::Setup(ExecSetup { app_name, service_name, command, tty })) };
    tx.send(setup).await.map_err(|_| ExitError::failure("exec stream closed before setup"))?;

    let raw_guard = if tty { Some(RawModeGuard::enable()?) } else { None };

    if interactive {
        let tx = tx.clone();
        tokio::spawn(async move {
            let mut stdin = tokio::io::stdin();
            let mut buf = [0u8; 4096];
            loop {
                match stdin.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        let payload = Payload::Stdin(buf[..n].to_vec());
                        if tx.send(ExecMessage { payload: Some(payload) }).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });
    }
    drop(tx);

    let response = inner.exec(ReceiverStream::new(rx)).await?;
    let mut inbound = response.into_inner();

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break,
            msg = inbound.next() => {
                match msg {
                    Some(Ok(ExecMessage { payload: Some(Payload::StdoutStderr(bytes)) })) => {
                        std::io::stdout().write_all(&bytes)?;
                        std::io::stdout().flush()?;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        drop(raw_guard);
                        return Err(e.into());
                    }
                    None => break,
                }
            }
        }
    }

    drop(raw_guard);
    Ok(())
}

#[cfg(unix)]
struct RawModeGuard {
    stdin: std::io::Stdin,
    original: nix::sys::termios::Termios,
}

#[cfg(unix)]
impl RawModeGuard {
    fn enable() -> Result<Self, ExitError> {
        use nix::sys::termios::{self, SetArg};
        let stdin = std::io::stdin();
        let original = termios::tcgetattr(&stdin)
            .map_err(|e| ExitError::failure(format!("failed to read terminal attributes: {e}")))?;
        let mut raw = original.clone();
        termios::cfmakeraw(&mut raw);
        termios::tcsetattr(&stdin, SetArg::TCSANOW, &raw)
            .map_err(|e| ExitError::failure(format!("failed to set raw mode: {e}")))?;
        Ok(RawModeGuard { stdin, original })
    }
}

#[cfg(unix)]
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = nix::sys::termios::tcsetattr(&self.stdin, nix::sys::termios::SetArg::TCSANOW, &self.original);
    }
}

#[cfg(not(unix))]
struct RawModeGuard;

#[cfg(not(unix))]
impl RawModeGuard {
    fn enable() -> Result<Self, ExitError> {
        Ok(RawModeGuard)
    }
}
