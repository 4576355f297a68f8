//! Scoreboard server configuration.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::undo::DEFAULT_HISTORY_LIMIT;

/// Configuration for the scoreboard server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// SQLite database file. Matches live only in memory when unset.
    #[serde(default)]
    database_path: Option<String>,

    /// Number of previous scores kept for undo, per match.
    #[serde(default = "default_history_limit")]
    history_limit: usize,

    /// Buffered updates per match before slow viewers start skipping.
    #[serde(default = "default_broadcast_capacity")]
    broadcast_capacity: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_broadcast_capacity() -> usize {
    64
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: None,
            history_limit: default_history_limit(),
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if a
    /// value is out of range.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid TOML or a value is
    /// out of range.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies command-line overrides on top of the loaded values.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        database_path: Option<String>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if database_path.is_some() {
            self.database_path = database_path;
        }
        self
    }

    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.broadcast_capacity == 0 {
            return Err(ConfigError::new(
                "broadcast_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
