use crate::error::{Error, Result};
use crate::server::platform::{self, PlatformProcessOps};
use crate::server::process::ProcessHandle;

/// Kills the owned process and cleans up anything it left behind.
///
/// Idempotent: a process that already exited is reported as success without
/// a second kill attempt. Every teardown step is attempted even when an
/// earlier one fails; failures are aggregated so a late error never masks an
/// earlier one. Consumes the handle, which closes the log file descriptor on
/// the way out.
pub(crate) async fn stop(
    mut handle: ProcessHandle,
    ops: PlatformProcessOps,
    port: u16,
) -> Result<()> {
    if let Ok(Some(status)) = handle.try_status() {
        tracing::debug!(%status, "Server process already exited; nothing to stop");
        return Ok(());
    }

    let mut failures: Vec<Error> = Vec::new();

    if let Err(e) = handle.kill() {
        tracing::error!(error = %e, "Kill request failed");
        failures.push(e);
    }

    match handle.wait().await {
        Ok(status) => tracing::debug!(%status, "Server process reaped"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to reap server process");
            failures.push(e);
        }
    }

    let strategy_result = match ops {
        PlatformProcessOps::GroupSignal => match handle.group_id() {
            Some(pgid) => platform::signal_group(pgid),
            None => Err(Error::Unsupported(
                "no process group was established at launch".to_string(),
            )),
        },
        PlatformProcessOps::PortSweep => platform::sweep_port(port).await,
    };
    if let Err(e) = strategy_result {
        tracing::error!(error = %e, "Survivor cleanup failed");
        failures.push(e);
    }

    // Dropping the handle closes the log file descriptor.
    drop(handle);

    match failures.len() {
        0 => Ok(()),
        1 => Err(failures.remove(0)),
        _ => Err(Error::Cleanup(
            failures
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}
