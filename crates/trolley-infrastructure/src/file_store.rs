//! File-backed key-value store.
//!
//! Persists the client's session record (and anything else small) as a single
//! JSON object on disk. Reads go back to the file every time so that separate
//! processes sharing the same path observe each other's writes; writes go
//! through a temp file and an atomic rename so a crash never leaves a
//! half-written store behind.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use trolley_core::error::{Result, TrolleyError};
use trolley_core::session::KeyValueStore;

use crate::paths::TrolleyPaths;

/// A `KeyValueStore` backed by one JSON file.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store over the given file path.
    ///
    /// The file and its parent directory are created lazily on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates a store at the default location (`~/.trolley/storage.json`).
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the home directory cannot be determined.
    pub fn default_location() -> Result<Self> {
        let paths = TrolleyPaths::default_location()?;
        Ok(Self::new(paths.storage_file()))
    }

    async fn load(&self) -> Result<HashMap<String, String>> {
        match fs::read_to_string(&self.path).await {
            Ok(json) => {
                let entries: HashMap<String, String> = serde_json::from_str(&json)
                    .map_err(|e| {
                        TrolleyError::storage(format!(
                            "Corrupt store file {:?}: {}",
                            self.path, e
                        ))
                    })?;
                Ok(entries)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(TrolleyError::storage(format!(
                "Failed to read store file {:?}: {}",
                self.path, e
            ))),
        }
    }

    async fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                TrolleyError::storage(format!("Failed to create {:?}: {}", parent, e))
            })?;
        }

        let json = serde_json::to_string_pretty(entries)?;

        // Temp file + rename keeps the store readable at every instant
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await.map_err(|e| {
            TrolleyError::storage(format!("Failed to write {:?}: {}", tmp_path, e))
        })?;
        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            TrolleyError::storage(format!(
                "Failed to replace {:?}: {}",
                self.path, e
            ))
        })?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.load().await?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_on_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("storage.json"));

        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");

        let store = FileKeyValueStore::new(&path);
        store.set("trolley.session", "{\"v\":1}").await.unwrap();

        // A second instance over the same path sees the write
        let reopened = FileKeyValueStore::new(&path);
        assert_eq!(
            reopened.get("trolley.session").await.unwrap(),
            Some("{\"v\":1}".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove_deletes_key_only() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("storage.json"));

        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.remove("a").await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileKeyValueStore::new(&path);
        let err = store.get("key").await.unwrap_err();
        assert!(err.is_storage_unavailable());
    }
}
