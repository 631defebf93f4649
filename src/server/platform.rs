//! Platform-conditional process operations.
//!
//! Two complete, mutually exclusive termination strategies exist, selected
//! once when the server is constructed:
//!
//! * `GroupSignal`: the child is launched as the leader of a new process
//!   group and `stop` signals the whole group, reaching any descendants.
//! * `PortSweep`: no grouping is available; `stop` inspects the OS listener
//!   table for processes still bound to the configured port and terminates
//!   each survivor.
use crate::error::{Error, Result};
use std::collections::BTreeSet;

/// Strategy for reaching processes the direct kill does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformProcessOps {
    /// Child runs as a process-group leader; stop signals the group.
    GroupSignal,
    /// No grouping; stop sweeps the listener table for survivors.
    PortSweep,
}

impl PlatformProcessOps {
    /// Selects the strategy for the host platform.
    pub fn for_host() -> Self {
        if cfg!(windows) {
            Self::PortSweep
        } else {
            Self::GroupSignal
        }
    }

    /// Whether the child will be launched as a process-group leader.
    pub fn uses_group_signaling(self) -> bool {
        matches!(self, Self::GroupSignal)
    }
}

/// Sends SIGINT to the process group `pgid`.
///
/// A group with no surviving members reports `ESRCH`, which counts as
/// success: there is nothing left to clean up.
#[cfg(unix)]
pub(crate) fn signal_group(pgid: i32) -> Result<()> {
    let rc = unsafe { libc::killpg(pgid, libc::SIGINT) };
    if rc == 0 {
        tracing::debug!(pgid, "Signaled process group");
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        tracing::debug!(pgid, "Process group already empty");
        Ok(())
    } else {
        Err(Error::Cleanup(format!(
            "Failed to signal process group {}: {}",
            pgid, err
        )))
    }
}

#[cfg(not(unix))]
pub(crate) fn signal_group(_pgid: i32) -> Result<()> {
    Err(Error::Unsupported(
        "process group signaling is not available on this platform".to_string(),
    ))
}

/// Extracts the set of process ids listening on `port` from `netstat -aon`
/// output.
///
/// The pid is the trailing column; the local address must end in `:<port>`.
/// A single process typically appears twice, once per address family, so the
/// result is deduplicated. Pid 0 (the idle pseudo-process) is skipped.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn parse_listener_pids(output: &str, port: u16) -> BTreeSet<u32> {
    let needle = format!(":{port}");
    let mut pids = BTreeSet::new();

    for line in output.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }
        let Some(local) = fields.get(1) else {
            continue;
        };
        if !local.ends_with(&needle) {
            continue;
        }
        let Some(pid) = fields.last().and_then(|p| p.parse::<u32>().ok()) else {
            continue;
        };
        if pid != 0 {
            pids.insert(pid);
        }
    }

    pids
}

/// Queries the listener table for processes still bound to `port` and
/// forcefully terminates each unique survivor.
#[cfg(windows)]
pub(crate) async fn sweep_port(port: u16) -> Result<()> {
    use async_process::Command;

    let output = Command::new("netstat")
        .arg("-aon")
        .output()
        .await
        .map_err(|e| Error::Cleanup(format!("Failed to query listener table: {}", e)))?;

    if !output.status.success() {
        return Err(Error::Cleanup(format!(
            "Listener table query exited with {}",
            output.status
        )));
    }

    let table = String::from_utf8_lossy(&output.stdout);
    let pids = parse_listener_pids(&table, port);
    tracing::debug!(port, survivors = pids.len(), "Listener sweep");

    let mut failed = Vec::new();
    for pid in pids {
        let status = Command::new("taskkill")
            .args(["/F", "/PID", &pid.to_string()])
            .status()
            .await;
        match status {
            Ok(status) if status.success() => {
                tracing::debug!(pid, "Terminated surviving listener")
            }
            Ok(status) => {
                tracing::warn!(pid, %status, "Failed to terminate surviving listener");
                failed.push(pid.to_string());
            }
            Err(e) => {
                tracing::warn!(pid, error = %e, "Failed to run taskkill");
                failed.push(pid.to_string());
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(Error::Cleanup(format!(
            "Failed to terminate surviving listener pid(s): {}",
            failed.join(", ")
        )))
    }
}

#[cfg(not(windows))]
pub(crate) async fn sweep_port(_port: u16) -> Result<()> {
    Err(Error::Unsupported(
        "listener sweep is only available on Windows".to_string(),
    ))
}
