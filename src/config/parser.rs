use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the proxy server instance to supervise.
///
/// This structure defines which executable to launch and which address the
/// running server is expected to listen on. The command can be an absolute
/// path or a name resolved against the search path at construction time.
///
/// # Examples
///
/// ```
/// use proxy_runner::config::ServerConfig;
///
/// let config = ServerConfig::new("browserup-proxy");
/// assert_eq!(config.host, "localhost");
/// assert_eq!(config.port, 8080);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Executable to launch. Either a path to an existing file or a name
    /// to look up on the search path.
    pub command: String,

    /// Host the server is expected to listen on.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port the server is expected to listen on. Always passed to the
    /// process as `--port=<port>`.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Creates a configuration for `command` with the default host and port.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Options governing one `start` invocation.
///
/// Controls where the combined stdout/stderr log is written and how long the
/// readiness poller waits for the server to open its port. The total startup
/// budget is `retry_interval * max_retries` (30 seconds by default).
///
/// # Examples
///
/// ```
/// use proxy_runner::config::StartOptions;
/// use std::time::Duration;
///
/// let options = StartOptions {
///     retry_interval_ms: 100,
///     max_retries: 20,
///     ..StartOptions::default()
/// };
/// assert_eq!(options.retry_interval(), Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartOptions {
    /// Directory the log file is created in.
    pub log_directory: PathBuf,

    /// Name of the log file. Truncated on every start.
    pub log_file_name: String,

    /// Pause between readiness probes, in milliseconds.
    pub retry_interval_ms: u64,

    /// Maximum number of readiness probes before giving up.
    pub max_retries: u32,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            log_directory: PathBuf::from("."),
            log_file_name: "server.log".to_string(),
            retry_interval_ms: 500,
            max_retries: 60,
        }
    }
}

impl StartOptions {
    /// Pause between readiness probes as a `Duration`.
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    /// Full path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.log_directory.join(&self.log_file_name)
    }
}

/// Main configuration for the Proxy Runner.
///
/// Bundles the server description with the start options so both can be
/// loaded from a single JSON document.
///
/// # JSON Schema
///
/// The configuration follows this JSON schema:
///
/// ```json
/// {
///   "server": {
///     "command": "browserup-proxy",
///     "host": "localhost",
///     "port": 8080
///   },
///   "start": {
///     "logDirectory": "/var/log/proxy",
///     "logFileName": "server.log",
///     "retryIntervalMs": 500,
///     "maxRetries": 60
///   }
/// }
/// ```
///
/// Everything except `server.command` is optional.
///
/// # Examples
///
/// ```
/// use proxy_runner::config::Config;
///
/// let config = Config::parse_from_str(r#"{"server": {"command": "browserup-proxy"}}"#).unwrap();
/// assert_eq!(config.start.max_retries, 60);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Which server to launch and where it will listen.
    pub server: ServerConfig,

    /// How to launch it and how long to wait for readiness.
    #[serde(default)]
    pub start: StartOptions,
}

impl Config {
    /// Loads a configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigParse` if:
    /// * The file cannot be read
    /// * The file contents are not valid JSON
    /// * The JSON does not conform to the expected schema
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigParse(format!("Failed to read config file: {}", e)))?;

        Self::parse_from_str(&content)
    }

    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigParse` if the string is not valid JSON or does
    /// not conform to the expected schema.
    pub fn parse_from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse JSON config: {}", e)))
    }
}
