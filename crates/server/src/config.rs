//! Server configuration.
//!
//! Values come from defaults, then an optional TOML file, then the `PORT`
//! environment variable, then command-line flags applied by the caller.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`ServerConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value was syntactically valid but unusable
    #[error("invalid value for {field}: {value}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Offending value
        value: String,
    },
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: SocketAddr,

    /// Current-progress document
    pub current_file: PathBuf,

    /// Historical document
    pub historical_file: PathBuf,

    /// Front-end directory served for non-API paths
    pub static_dir: PathBuf,

    /// Origins allowed to call `/api/*`
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            current_file: PathBuf::from("progress_data.json"),
            historical_file: PathBuf::from("historical_data.json"),
            static_dir: PathBuf::from("frontend"),
            allowed_origins: vec![
                "http://localhost:8000".to_string(),
                "http://127.0.0.1:8000".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML content.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply the `PORT` variable, if set.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        match std::env::var("PORT") {
            Ok(port) => self.with_port_str(&port),
            Err(_) => Ok(self),
        }
    }

    /// Listen on `port`, keeping the configured host.
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind.set_port(port);
        self
    }

    /// Keep both documents in `dir` under their default file names.
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.current_file = dir.join("progress_data.json");
        self.historical_file = dir.join("historical_data.json");
        self
    }

    fn with_port_str(self, port: &str) -> Result<Self, ConfigError> {
        let port = port.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
            field: "PORT",
            value: port.to_string(),
        })?;
        Ok(self.with_port(port))
    }
}
