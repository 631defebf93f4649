use crate::config::{Config, ServerConfig, StartOptions};
use crate::error::{Error, Result};

/// Validates the server description.
pub fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.command.is_empty() {
        return Err(Error::ConfigInvalid("Server command is empty".to_string()));
    }

    if config.host.is_empty() {
        return Err(Error::ConfigInvalid("Server host is empty".to_string()));
    }

    // Port 0 would ask the server to pick its own port, which the readiness
    // poller could never find.
    if config.port == 0 {
        return Err(Error::ConfigInvalid(
            "Server port must be non-zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates the start options.
pub fn validate_start_options(options: &StartOptions) -> Result<()> {
    if options.log_file_name.is_empty() {
        return Err(Error::ConfigInvalid("Log file name is empty".to_string()));
    }

    if options.max_retries == 0 {
        return Err(Error::ConfigInvalid(
            "At least one readiness attempt is required".to_string(),
        ));
    }

    Ok(())
}

/// Full configuration validation.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_server_config(&config.server)?;
    validate_start_options(&config.start)?;

    Ok(())
}
