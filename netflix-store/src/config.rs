//! Configuration management.

use std::path::{Path, PathBuf};

use netflix_fetch::ServiceConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_config_path, default_session_path, load_json, save_json};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Service coordinates and transport settings.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Log level when neither `--verbose` nor `RUST_LOG` is given.
    #[serde(default)]
    pub log_level: LogLevel,
    /// Where the session cookie is kept. Defaults next to the config file.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    pub async fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path()).await
    }

    /// Loads configuration from a specific path. A missing file yields defaults.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let config: Config = load_json(path).await?;
        config.validate()?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to a specific path.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        self.validate()?;
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Path of the session file.
    pub fn session_path(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(default_session_path)
    }

    /// Rejects values the client cannot work with.
    pub fn validate(&self) -> Result<(), StoreError> {
        let base = &self.service.base_url;
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(StoreError::Config(format!("base_url must be an http(s) URL: {base}")));
        }
        if self.service.timeout_secs == 0 {
            return Err(StoreError::Config("timeout_secs must be positive".to_string()));
        }
        if !self.service.avatar_url_template.contains("{id}") {
            return Err(StoreError::Config(
                "avatar_url_template must contain {id}".to_string(),
            ));
        }
        Ok(())
    }
}
