//! TCP-connect readiness probing (§4.4, §9 open question: the per-node
//! timeout is a configurable field rather than the source's hard-coded
//! 60s, so tests can drive the S3 timeout scenario in well under a
//! minute).

use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

#[derive(Debug, Clone, Copy)]
pub struct ReadinessConfig {
    pub dial_timeout: Duration,
    pub retry_interval: Duration,
    pub overall_timeout: Duration,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        ReadinessConfig {
            dial_timeout: Duration::from_secs(1),
            retry_interval: Duration::from_secs(2),
            overall_timeout: Duration::from_secs(60),
        }
    }
}

/// Poll `localhost:<port>` until a TCP connect succeeds or `config`'s
/// overall timeout elapses. A node with no exposed host port is trivially
/// ready — the caller is expected to only invoke this when `port` is set.
pub async fn wait_until_ready(port: u16, config: ReadinessConfig) -> Result<(), ReadinessError> {
    let deadline = tokio::time::Instant::now() + config.overall_timeout;
    loop {
        let attempt = timeout(config.dial_timeout, TcpStream::connect(("127.0.0.1", port))).await;
        if let Ok(Ok(_)) = attempt {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(ReadinessError::TimedOut {
                port,
                timeout_secs: config.overall_timeout.as_secs(),
            });
        }
        tokio::time::sleep(config.retry_interval).await;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReadinessError {
    #[error("port {port} did not accept a connection within {timeout_secs}s")]
    TimedOut { port: u16, timeout_secs: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn succeeds_once_listener_is_already_up() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            loop {
                if listener.accept().await.is_err() {
                    break;
                }
            }
        });

        let config = ReadinessConfig {
            dial_timeout: Duration::from_millis(200),
            retry_interval: Duration::from_millis(50),
            overall_timeout: Duration::from_secs(2),
        };
        wait_until_ready(port, config).await.unwrap();
    }

    #[tokio::test]
    async fn times_out_when_nothing_is_listening() {
        let config = ReadinessConfig {
            dial_timeout: Duration::from_millis(100),
            retry_interval: Duration::from_millis(100),
            overall_timeout: Duration::from_millis(400),
        };
        // Port 1 is privileged/unused in test sandboxes; treat any free
        // high port with nothing bound as "closed".
        let err = wait_until_ready(59999, config).await.unwrap_err();
        assert!(matches!(err, ReadinessError::TimedOut { .. }));
    }
}
