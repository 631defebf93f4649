use crate::config::{ServerConfig, StartOptions};
use crate::error::{Error, Result};
use crate::server::process::ProcessHandle;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;

/// Budget for a single connect probe.
pub(crate) const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Attempts one TCP connection to `host:port`.
///
/// Readiness is defined purely by connection establishment; no payload is
/// exchanged. Bounded by [`PROBE_TIMEOUT`].
pub(crate) async fn probe(host: &str, port: u16) -> bool {
    matches!(
        time::timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await,
        Ok(Ok(_))
    )
}

/// Waits until the server accepts connections, the process dies, or the
/// retry budget runs out.
///
/// Each iteration probes the port, then polls the process. A dead process
/// aborts immediately: connectivity will never succeed, so retrying would
/// only delay the diagnosis. Exhausting the budget surfaces
/// `Error::StartupTimeout`; the caller is responsible for tearing down the
/// still-running process.
pub(crate) async fn await_ready(
    handle: &mut ProcessHandle,
    config: &ServerConfig,
    options: &StartOptions,
) -> Result<()> {
    for attempt in 0..options.max_retries {
        if probe(&config.host, config.port).await {
            tracing::debug!(attempt, "Server is accepting connections");
            return Ok(());
        }

        // Any exit counts as startup failure, successful status included.
        if let Some(status) = handle.try_status()? {
            tracing::error!(
                %status,
                log_file = %handle.log_path().display(),
                "Server process exited before becoming reachable"
            );
            return Err(Error::StartupFailure {
                log_file: handle.log_path().display().to_string(),
            });
        }

        time::sleep(options.retry_interval()).await;
    }

    tracing::error!(
        host = %config.host,
        port = config.port,
        attempts = options.max_retries,
        "Retry budget exhausted while waiting for server readiness"
    );
    Err(Error::StartupTimeout {
        host: config.host.clone(),
        port: config.port,
        attempts: options.max_retries,
    })
}
