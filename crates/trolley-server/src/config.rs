//! Server configuration.
//!
//! Loaded from an optional TOML file with environment-variable overrides:
//!
//! - `TROLLEY_CONFIG` - path of the config file (default
//!   `~/.trolley/server.toml`; silently skipped when absent)
//! - `TROLLEY_ADDR` - bind address
//! - `TROLLEY_DATA_DIR` - directory for the file-backed item store; unset
//!   means items live in memory only

use std::path::PathBuf;

use serde::Deserialize;

use trolley_core::error::Result;
use trolley_infrastructure::TrolleyPaths;

/// Default bind address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener on.
    pub addr: String,
    /// Directory for durable item storage. `None` keeps items in memory.
    pub data_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            data_dir: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration: file first, then environment overrides.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os("TROLLEY_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => match TrolleyPaths::default_location() {
                Ok(paths) => paths.config_file(),
                // No home directory (e.g. containers); file config is
                // simply unavailable there
                Err(_) => return Ok(Self::default().with_env_overrides()),
            },
        };

        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            toml::from_str(&raw)?
        } else {
            Self::default()
        };
        config = config.with_env_overrides();
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(addr) = std::env::var("TROLLEY_ADDR") {
            self.addr = addr;
        }
        if let Ok(dir) = std::env::var("TROLLEY_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        self
    }
}
