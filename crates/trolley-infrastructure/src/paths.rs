//! Path management for Trolley's on-disk data.
//!
//! Everything durable lives under a single base directory (`~/.trolley` by
//! default) so client session state and server item data are easy to find
//! and easy to wipe.

use std::path::{Path, PathBuf};

use trolley_core::error::{Result, TrolleyError};

/// Resolves the locations of Trolley's data files.
///
/// # Directory Structure
///
/// ```text
/// ~/.trolley/
/// ├── storage.json    # client key-value store (session record)
/// ├── items.json      # server item store (file-backed repository)
/// └── server.toml     # optional server configuration
/// ```
#[derive(Debug, Clone)]
pub struct TrolleyPaths {
    base_dir: PathBuf,
}

impl TrolleyPaths {
    /// Uses an explicit base directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Resolves the default base directory (`~/.trolley`).
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the home directory cannot be determined.
    pub fn default_location() -> Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| TrolleyError::config("Failed to get home directory"))?;
        Ok(Self::new(home_dir.join(".trolley")))
    }

    /// The base directory itself.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the client key-value store file.
    pub fn storage_file(&self) -> PathBuf {
        self.base_dir.join("storage.json")
    }

    /// Path of the server's file-backed item store.
    pub fn items_file(&self) -> PathBuf {
        self.base_dir.join("items.json")
    }

    /// Path of the optional server configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("server.toml")
    }
}
