//! Server management module for Proxy Runner.
//!
//! This module owns the lifecycle of the supervised proxy server process:
//! launching it, waiting for it to accept connections, and tearing it down
//! reliably. It also provides the descriptor type used to address a server
//! that some other process manages.
//!
//! # Components
//!
//! * `platform` - Termination strategy selection and platform process operations
//! * `process` - The owned process handle and spawn logic
//! * `readiness` - TCP readiness probing with bounded retries
//! * `terminate` - Idempotent, aggregating teardown
//!
//! # Examples
//!
//! Launching and stopping a server:
//!
//! ```no_run
//! use proxy_runner::config::{ServerConfig, StartOptions};
//! use proxy_runner::server::ProxyServer;
//!
//! #[tokio::main]
//! async fn main() -> proxy_runner::Result<()> {
//!     let mut server = ProxyServer::new(ServerConfig::new("browserup-proxy"))?;
//!     server.start(StartOptions::default()).await?;
//!
//!     let session = server.create_session(Default::default());
//!     println!("Session {} against {}", session.id(), session.host_port());
//!
//!     server.stop().await
//! }
//! ```
//!
//! Addressing a server launched elsewhere:
//!
//! ```no_run
//! use proxy_runner::server::RemoteServer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let remote = RemoteServer::new("proxy.internal", 8080);
//!     if remote.is_listening().await {
//!         let session = remote.create_session(Default::default());
//!         println!("Attached: {}", session.host_port());
//!     }
//! }
//! ```
pub mod platform;
mod process;
mod readiness;
mod terminate;

pub use platform::PlatformProcessOps;
pub use process::{ProcessHandle, ServerStatus};

use crate::config::{ServerConfig, StartOptions, validator};
use crate::error::{Error, Result};
use crate::locate::BinaryLocator;
use crate::session::ProxySession;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Descriptor for a proxy server that this process did not launch.
///
/// Holds only the address. Everything a descriptor can do (create sessions,
/// probe for readiness) works equally against a managed server, so
/// [`ProxyServer`] composes one and delegates to it.
#[derive(Debug, Clone)]
pub struct RemoteServer {
    host: String,
    port: u16,
}

impl RemoteServer {
    /// Creates a descriptor for the server at `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host of the server.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port of the server.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address as `host:port`, the form the session client consumes.
    pub fn host_port(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL the server's REST interface is reachable on. This is not the
    /// address clients should proxy their traffic through.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Creates a session handle against this server.
    ///
    /// Pure factory: no I/O happens until a session client consumes the
    /// handle.
    pub fn create_session(&self, params: HashMap<String, String>) -> ProxySession {
        ProxySession::new(self.host_port(), params)
    }

    /// Whether a TCP listener currently accepts connections on the
    /// configured address. Usable to check an already-started server before
    /// attaching to it.
    pub async fn is_listening(&self) -> bool {
        readiness::probe(&self.host, self.port).await
    }
}

/// A locally managed proxy server.
///
/// Resolves the executable at construction time, owns at most one live
/// process, and adds `start`/`stop` lifecycle management on top of the
/// addressing operations of [`RemoteServer`].
///
/// A single logical caller drives each instance; `start` and `stop` take
/// `&mut self` and the readiness wait blocks the calling task. No internal
/// locking or background task is involved.
#[derive(Debug)]
pub struct ProxyServer {
    /// Addressing half, shared with unmanaged servers
    remote: RemoteServer,
    /// Server configuration
    config: ServerConfig,
    /// Resolved executable path
    executable: PathBuf,
    /// Termination strategy, selected once at construction
    ops: PlatformProcessOps,
    /// The owned process, when running
    handle: Option<ProcessHandle>,
    /// Server status
    status: ServerStatus,
}

impl ProxyServer {
    /// Creates a managed server from `config`, resolving the executable
    /// against the process-wide search path.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigInvalid` for a rejected configuration and
    /// `Error::BinaryNotFound` when the executable cannot be located.
    pub fn new(config: ServerConfig) -> Result<Self> {
        Self::with_locator(config, &BinaryLocator::from_env())
    }

    /// Creates a managed server resolving the executable with an explicitly
    /// constructed locator.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(config, locator), fields(command = %config.command))]
    pub fn with_locator(config: ServerConfig, locator: &BinaryLocator) -> Result<Self> {
        validator::validate_server_config(&config)?;
        let executable = locator.resolve(&config.command)?;
        let ops = PlatformProcessOps::for_host();
        tracing::debug!(
            executable = %executable.display(),
            ?ops,
            "Constructed managed server"
        );

        Ok(Self {
            remote: RemoteServer::new(config.host.clone(), config.port),
            config,
            executable,
            ops,
            handle: None,
            status: ServerStatus::Stopped,
        })
    }

    /// Launches the server process and waits until it accepts connections.
    ///
    /// Blocks the calling task for up to `retry_interval * max_retries`.
    /// When the retry budget runs out, the half-started process is stopped
    /// best-effort before `Error::StartupTimeout` is surfaced.
    ///
    /// This method is instrumented with `tracing`.
    ///
    /// # Errors
    ///
    /// * `Error::AlreadyRunning` - a live process is already owned
    /// * `Error::Launch` - the OS could not spawn the process
    /// * `Error::StartupFailure` - the process exited before becoming reachable
    /// * `Error::StartupTimeout` - the retry budget ran out
    #[tracing::instrument(skip(self, options), fields(executable = %self.executable.display(), port = self.config.port))]
    pub async fn start(&mut self, options: StartOptions) -> Result<()> {
        if self.handle.is_some() {
            tracing::warn!("Start requested while a server process is already owned");
            return Err(Error::AlreadyRunning);
        }
        validator::validate_start_options(&options)?;

        self.status = ServerStatus::Starting;
        tracing::info!("Starting server process");

        let mut handle = match process::spawn(&self.executable, &self.config, &options, self.ops) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(error = %e, "Failed to launch server process");
                self.status = ServerStatus::Failed;
                return Err(e);
            }
        };

        match readiness::await_ready(&mut handle, &self.config, &options).await {
            Ok(()) => {
                tracing::info!(pid = handle.pid(), "Server started successfully");
                self.handle = Some(handle);
                self.status = ServerStatus::Running;
                Ok(())
            }
            Err(e @ Error::StartupTimeout { .. }) => {
                // The process is still alive; tear it down before surfacing.
                self.handle = Some(handle);
                if let Err(stop_err) = self.stop().await {
                    tracing::warn!(error = %stop_err, "Best-effort stop after startup timeout failed");
                }
                self.status = ServerStatus::Failed;
                Err(e)
            }
            Err(e) => {
                // Process already exited; dropping the handle closes the log.
                self.status = ServerStatus::Failed;
                Err(e)
            }
        }
    }

    /// Stops the owned server process.
    ///
    /// Safe to call at any time: without an owned process this is a no-op,
    /// and a process that already exited is not killed a second time. All
    /// teardown steps are attempted even when one fails.
    ///
    /// This method is instrumented with `tracing`.
    ///
    /// # Errors
    ///
    /// * `Error::Process` - the kill or reap request failed
    /// * `Error::Cleanup` - the recovery sweep failed, or several steps failed
    /// * `Error::Unsupported` - group signaling without an established group
    #[tracing::instrument(skip(self), fields(port = self.config.port))]
    pub async fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            tracing::debug!("Stop requested but no server process is owned");
            return Ok(());
        };

        self.status = ServerStatus::Stopping;
        tracing::info!(pid = handle.pid(), "Stopping server process");

        let result = terminate::stop(handle, self.ops, self.config.port).await;
        self.status = match &result {
            Ok(()) => ServerStatus::Stopped,
            Err(_) => ServerStatus::Failed,
        };
        if result.is_ok() {
            tracing::info!("Server stopped");
        }
        result
    }

    /// Current lifecycle status.
    pub fn status(&self) -> ServerStatus {
        self.status
    }

    /// Resolved path of the server executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Process id of the owned server process, when one is running.
    pub fn pid(&self) -> Option<u32> {
        self.handle.as_ref().map(ProcessHandle::pid)
    }

    /// Path of the log file of the owned server process, when one is running.
    pub fn log_path(&self) -> Option<&Path> {
        self.handle.as_ref().map(ProcessHandle::log_path)
    }

    /// The addressing half of this server.
    pub fn remote(&self) -> &RemoteServer {
        &self.remote
    }

    /// Host the server listens on.
    pub fn host(&self) -> &str {
        self.remote.host()
    }

    /// Port the server listens on.
    pub fn port(&self) -> u16 {
        self.remote.port()
    }

    /// Address as `host:port`. See [`RemoteServer::host_port`].
    pub fn host_port(&self) -> String {
        self.remote.host_port()
    }

    /// URL of the server's REST interface. See [`RemoteServer::url`].
    pub fn url(&self) -> String {
        self.remote.url()
    }

    /// Creates a session handle against this server. See
    /// [`RemoteServer::create_session`].
    pub fn create_session(&self, params: HashMap<String, String>) -> ProxySession {
        self.remote.create_session(params)
    }

    /// Probes the configured address for an accepting listener. See
    /// [`RemoteServer::is_listening`].
    pub async fn is_listening(&self) -> bool {
        self.remote.is_listening().await
    }
}
