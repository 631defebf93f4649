//! Configuration module for Proxy Runner.
//!
//! This module handles parsing, validation, and access to configuration
//! settings for the supervised proxy server. It supports loading
//! configurations from files or strings in JSON format.
//!
//! # Examples
//!
//! Loading a configuration from a file:
//!
//! ```no_run
//! use proxy_runner::config::Config;
//!
//! let config = Config::from_file("config.json").unwrap();
//! println!("Will launch '{}' on port {}", config.server.command, config.server.port);
//! ```
//!
//! Creating a configuration programmatically:
//!
//! ```
//! use proxy_runner::config::{ServerConfig, StartOptions};
//!
//! let server = ServerConfig::new("browserup-proxy");
//! let start = StartOptions::default();
//! assert_eq!(server.port, 8080);
//! assert_eq!(start.log_file_name, "server.log");
//! ```
mod parser;
pub mod validator;

pub use parser::{Config, ServerConfig, StartOptions};
pub use validator::validate_config;
