/// Error handling module for Proxy Runner.
///
/// This module defines the error types used throughout the library.
/// It covers everything that can go wrong while locating, launching,
/// waiting on, and tearing down the supervised proxy server process.
///
/// # Example
///
/// ```
/// use proxy_runner::error::{Error, Result};
///
/// fn handle_error(result: Result<()>) {
///     match result {
///         Ok(_) => println!("Operation succeeded"),
///         Err(Error::BinaryNotFound(path)) => println!("No proxy binary at '{}'", path),
///         Err(Error::StartupTimeout { host, port, attempts }) => {
///             println!("{}:{} never came up after {} attempts", host, port, attempts)
///         }
///         Err(e) => println!("Other error: {}", e),
///     }
/// }
/// ```
use thiserror::Error;

/// Errors that can occur in the proxy-runner library.
///
/// Each variant carries enough context to diagnose the failure without
/// consulting the logs; none of them are swallowed internally.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to parse configuration from a file or string.
    ///
    /// This error occurs when:
    /// - The configuration JSON is malformed
    /// - Required fields are missing
    /// - Field types are incorrect
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration is valid JSON but contains invalid values.
    ///
    /// This error occurs when:
    /// - The command is empty
    /// - The port is zero
    /// - The retry budget is zero
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The proxy server executable could not be located.
    ///
    /// This error occurs when:
    /// - The configured path does not name an existing file
    /// - No directory on the search path contains the executable
    #[error("Proxy server binary couldn't be found in path provided: {0}")]
    BinaryNotFound(String),

    /// The operating system failed to spawn the server process.
    ///
    /// This error occurs when:
    /// - The log file cannot be created
    /// - The executable exists but cannot be run
    #[error("Failed to launch server process: {0}")]
    Launch(String),

    /// The server process exited before it became reachable.
    ///
    /// This error occurs when:
    /// - The server crashes during startup
    /// - The server refuses its configuration and exits
    #[error("The server process failed to start. Check {log_file} for a helpful error message")]
    StartupFailure {
        /// Path of the log file the process was writing to.
        log_file: String,
    },

    /// The retry budget ran out while the process was still alive.
    ///
    /// This error occurs when:
    /// - The server is too slow to open its listening port
    /// - The server is listening on a different host or port than configured
    #[error("Can't connect to server on {host}:{port} after {attempts} attempts")]
    StartupTimeout {
        /// Host the readiness probe targeted.
        host: String,
        /// Port the readiness probe targeted.
        port: u16,
        /// Number of connect attempts made.
        attempts: u32,
    },

    /// Error when polling, killing, or reaping the server process.
    ///
    /// This error occurs when:
    /// - The process status cannot be queried
    /// - The kill request is rejected by the OS
    #[error("Server process error: {0}")]
    Process(String),

    /// Post-kill cleanup failed.
    ///
    /// This error occurs when:
    /// - The listener-table query used by the recovery sweep fails
    /// - A surviving process could not be terminated
    /// - Several teardown steps failed and were aggregated
    #[error("Cleanup error: {0}")]
    Cleanup(String),

    /// A platform-specific capability was invoked where it is unavailable.
    ///
    /// This error occurs when:
    /// - Group signaling is requested but no process group was established
    #[error("Unsupported on this platform: {0}")]
    Unsupported(String),

    /// The server is already running.
    ///
    /// This error occurs when:
    /// - Attempting to start a server that already owns a live process
    #[error("Already running")]
    AlreadyRunning,
}

/// Result type for proxy-runner operations.
///
/// This is a convenience type alias for `std::result::Result` with the `Error` type
/// from this module.
pub type Result<T> = std::result::Result<T, Error>;
