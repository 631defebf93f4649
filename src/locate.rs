//! Executable resolution for Proxy Runner.
//!
//! Resolves the configured command to a runnable file before anything is
//! launched, so a missing installation fails fast instead of surfacing as a
//! confusing spawn error. The search path is captured once at construction,
//! which keeps resolution deterministic and testable without touching the
//! real process environment.
//!
//! # Examples
//!
//! ```no_run
//! use proxy_runner::locate::BinaryLocator;
//!
//! let locator = BinaryLocator::from_env();
//! let executable = locator.resolve("browserup-proxy").unwrap();
//! println!("Launching {}", executable.display());
//! ```
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

#[cfg(windows)]
const SEARCH_PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
const SEARCH_PATH_SEPARATOR: char = ':';

/// Windows installs ship the proxy entry point as a batch file.
#[cfg(windows)]
const EXECUTABLE_SUFFIX: Option<&str> = Some(".bat");
#[cfg(not(windows))]
const EXECUTABLE_SUFFIX: Option<&str> = None;

/// Resolves a command name or path to an existing executable file.
///
/// Checks the literal path first, then every directory on the captured
/// search path. Purely a lookup; nothing is executed.
#[derive(Debug, Clone)]
pub struct BinaryLocator {
    search_path: String,
    separator: char,
    suffix: Option<String>,
}

impl BinaryLocator {
    /// Creates a locator from the process-wide `PATH` variable, using the
    /// host platform's separator and executable suffix conventions.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("PATH").unwrap_or_default(),
            SEARCH_PATH_SEPARATOR,
            EXECUTABLE_SUFFIX.map(str::to_string),
        )
    }

    /// Creates a locator over an explicit search path.
    ///
    /// Useful in tests and in environments where the caller curates the
    /// search path instead of trusting the inherited one.
    pub fn new(search_path: impl Into<String>, separator: char, suffix: Option<String>) -> Self {
        Self {
            search_path: search_path.into(),
            separator,
            suffix,
        }
    }

    /// Resolves `command` to an existing file.
    ///
    /// The platform suffix is appended when missing. The literal path wins
    /// over search-path entries, and directories are checked in order.
    ///
    /// # Errors
    ///
    /// Returns `Error::BinaryNotFound` when neither the literal path nor any
    /// search-path directory contains the file.
    pub fn resolve(&self, command: &str) -> Result<PathBuf> {
        let name = self.apply_suffix(command);

        let literal = Path::new(&name);
        if literal.is_file() {
            tracing::debug!(path = %literal.display(), "Resolved executable from literal path");
            return Ok(literal.to_path_buf());
        }

        for dir in self.search_path.split(self.separator) {
            if dir.is_empty() {
                continue;
            }
            let candidate = Path::new(dir).join(&name);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "Resolved executable from search path");
                return Ok(candidate);
            }
        }

        tracing::error!(command = %name, "Executable not found");
        Err(Error::BinaryNotFound(name))
    }

    fn apply_suffix(&self, command: &str) -> String {
        match &self.suffix {
            Some(suffix) if !command.ends_with(suffix.as_str()) => format!("{command}{suffix}"),
            _ => command.to_string(),
        }
    }
}
