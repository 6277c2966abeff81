use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/trysql-watcher/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("trysql-watcher").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - A program to launch is configured
    /// - Sentinels and protocol commands are non-empty
    /// - Protocol commands fit on a single line
    /// - A response timeout, when set, is positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shell.program.trim().is_empty() {
            return Err(invalid("shell.program must not be empty"));
        }

        let protocol = &self.protocol;
        for (field, value) in [
            ("protocol.ready_sentinel", &protocol.ready_sentinel),
            ("protocol.destroyed_sentinel", &protocol.destroyed_sentinel),
            ("protocol.bootstrap_command", &protocol.bootstrap_command),
            ("protocol.quit_command", &protocol.quit_command),
        ] {
            if value.is_empty() {
                return Err(invalid(&format!("{} must not be empty", field)));
            }
        }

        for (field, value) in [
            ("protocol.bootstrap_command", &protocol.bootstrap_command),
            ("protocol.quit_command", &protocol.quit_command),
        ] {
            if value.contains('\n') {
                return Err(invalid(&format!("{} must be a single line", field)));
            }
        }

        if protocol.response_timeout_ms == Some(0) {
            return Err(invalid("protocol.response_timeout_ms must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError {
        message: message.to_string(),
    }
}
