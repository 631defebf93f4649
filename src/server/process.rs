use crate::config::{ServerConfig, StartOptions};
use crate::error::{Error, Result};
use crate::server::platform::PlatformProcessOps;
use async_process::{Child, Command, Stdio};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, ExitStatus};

/// Status of the supervised server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    /// Server is starting
    Starting,
    /// Server is running
    Running,
    /// Server is stopping
    Stopping,
    /// Server has stopped
    Stopped,
    /// Server failed to start or crashed
    Failed,
}

/// Ownership of one live server process and its redirected log file.
///
/// Exactly one handle exists per running server. Owning it implies the
/// exclusive right to poll, kill, and reap the process. Dropping the handle
/// closes the log file descriptor.
#[derive(Debug)]
pub struct ProcessHandle {
    /// Child process
    child: Child,
    /// Parent-side handle to the log file; held so the descriptor's lifetime
    /// matches the process handle's
    _log_file: File,
    /// Path of the log file, for diagnostics
    log_path: PathBuf,
    /// Process group id recorded at spawn, when grouping was established
    group_id: Option<i32>,
}

impl ProcessHandle {
    /// OS process id of the direct child.
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Path of the log file the process writes to.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub(crate) fn group_id(&self) -> Option<i32> {
        self.group_id
    }

    /// Non-blocking poll for the process exit status.
    pub fn try_status(&mut self) -> Result<Option<ExitStatus>> {
        self.child
            .try_status()
            .map_err(|e| Error::Process(format!("Failed to poll server process: {}", e)))
    }

    pub(crate) fn kill(&mut self) -> Result<()> {
        self.child
            .kill()
            .map_err(|e| Error::Process(format!("Failed to kill server process: {}", e)))
    }

    pub(crate) async fn wait(&mut self) -> Result<ExitStatus> {
        self.child
            .status()
            .await
            .map_err(|e| Error::Process(format!("Failed to reap server process: {}", e)))
    }
}

/// Launches the server process with stdout and stderr redirected to the log
/// file and stdin disconnected.
///
/// The log file is created (or truncated) at `options.log_path()`. On
/// group-capable platforms the child becomes the leader of a new process
/// group and the group id is recorded on the returned handle.
pub(crate) fn spawn(
    executable: &Path,
    config: &ServerConfig,
    options: &StartOptions,
    ops: PlatformProcessOps,
) -> Result<ProcessHandle> {
    let log_path = options.log_path();
    let log_file = File::create(&log_path).map_err(|e| {
        Error::Launch(format!(
            "Failed to open log file {}: {}",
            log_path.display(),
            e
        ))
    })?;
    let stdout = clone_log_handle(&log_file, &log_path)?;
    let stderr = clone_log_handle(&log_file, &log_path)?;

    let mut command = build_command(executable, config.port);
    configure_grouping(&mut command, ops);

    let mut command = Command::from(command);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));
    let child = command
        .spawn()
        .map_err(|e| Error::Launch(format!("Failed to start server process: {}", e)))?;

    let group_id = if ops.uses_group_signaling() {
        // setsid makes the child the leader, so its pid is the group id
        Some(child.id() as i32)
    } else {
        None
    };

    tracing::debug!(pid = child.id(), log = %log_path.display(), "Spawned server process");

    Ok(ProcessHandle {
        child,
        _log_file: log_file,
        log_path,
        group_id,
    })
}

fn clone_log_handle(log_file: &File, log_path: &Path) -> Result<File> {
    log_file.try_clone().map_err(|e| {
        Error::Launch(format!(
            "Failed to duplicate log file handle for {}: {}",
            log_path.display(),
            e
        ))
    })
}

/// Builds the launch invocation: a `sh` wrapper on macOS, direct invocation
/// elsewhere, always with `--port=<port>` appended.
fn build_command(executable: &Path, port: u16) -> StdCommand {
    let mut command = if cfg!(target_os = "macos") {
        let mut c = StdCommand::new("sh");
        c.arg(executable);
        c
    } else {
        StdCommand::new(executable)
    };
    command.arg(format!("--port={port}"));
    command
}

#[cfg(unix)]
fn configure_grouping(command: &mut StdCommand, ops: PlatformProcessOps) {
    use std::os::unix::process::CommandExt;

    if ops.uses_group_signaling() {
        unsafe {
            command.pre_exec(|| {
                if libc::setsid() == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }
    }
}

#[cfg(windows)]
fn configure_grouping(command: &mut StdCommand, _ops: PlatformProcessOps) {
    use std::os::windows::process::CommandExt;

    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    command.creation_flags(CREATE_NEW_PROCESS_GROUP);
}
