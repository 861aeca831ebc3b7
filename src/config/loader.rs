use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::types::Config;

/// Upper bound for any simulated latency.
const MAX_LATENCY_MS: u64 = 10_000;

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
    /// Uses `~/.config/photovault/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("photovault").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
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
    /// - The startup grid column count is between 2 and 6
    /// - No simulated latency exceeds 10 seconds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=6).contains(&self.ui.grid_columns) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "ui.grid_columns must be between 2 and 6, got {}",
                    self.ui.grid_columns
                ),
            });
        }

        let latencies = [
            ("auth_ms", self.latency.auth_ms),
            ("gallery_ms", self.latency.gallery_ms),
            ("upload_ms", self.latency.upload_ms),
            ("processing_ms", self.latency.processing_ms),
        ];
        for (name, value) in latencies {
            if value > MAX_LATENCY_MS {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "latency.{} must be at most {}ms, got {}",
                        name, MAX_LATENCY_MS, value
                    ),
                });
            }
        }

        Ok(())
    }
}
