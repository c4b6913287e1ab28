//! File-backed item repository.
//!
//! Keeps the whole item map in memory and rewrites `items.json` after every
//! mutation, using the same temp-file-and-rename discipline as the key-value
//! store. Suitable for a single server process; anything stronger belongs to
//! a real database.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use trolley_core::error::{Result, TrolleyError};
use trolley_core::item::{ItemRepository, ItemUpdate, ListItem};

type ItemMap = HashMap<String, Vec<ListItem>>;

/// An `ItemRepository` persisted to one JSON file.
#[derive(Debug, Clone)]
pub struct FileItemRepository {
    path: PathBuf,
    /// `None` until the file has been loaded once.
    cache: Arc<RwLock<Option<ItemMap>>>,
}

impl FileItemRepository {
    /// Creates a repository over the given file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    async fn load_if_needed(&self, cache: &mut Option<ItemMap>) -> Result<()> {
        if cache.is_some() {
            return Ok(());
        }
        let map = match fs::read_to_string(&self.path).await {
            Ok(json) => serde_json::from_str(&json).map_err(|e| {
                TrolleyError::storage(format!("Corrupt item store {:?}: {}", self.path, e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ItemMap::new(),
            Err(e) => {
                return Err(TrolleyError::storage(format!(
                    "Failed to read item store {:?}: {}",
                    self.path, e
                )))
            }
        };
        *cache = Some(map);
        Ok(())
    }

    async fn save(&self, map: &ItemMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                TrolleyError::storage(format!("Failed to create {:?}: {}", parent, e))
            })?;
        }
        let json = serde_json::to_string_pretty(map)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await.map_err(|e| {
            TrolleyError::storage(format!("Failed to write {:?}: {}", tmp_path, e))
        })?;
        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            TrolleyError::storage(format!("Failed to replace {:?}: {}", self.path, e))
        })?;
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for FileItemRepository {
    async fn list(&self, list_code: &str) -> Result<Vec<ListItem>> {
        let mut cache = self.cache.write().await;
        self.load_if_needed(&mut cache).await?;
        let map = cache.as_ref().unwrap();
        Ok(map.get(list_code).cloned().unwrap_or_default())
    }

    async fn insert(&self, list_code: &str, name: &str) -> Result<ListItem> {
        let mut cache = self.cache.write().await;
        self.load_if_needed(&mut cache).await?;
        let map = cache.as_mut().unwrap();

        let item = ListItem::new(list_code, name);
        map.entry(list_code.to_string())
            .or_default()
            .push(item.clone());
        self.save(map).await?;
        Ok(item)
    }

    async fn update(&self, list_code: &str, item_id: &str, update: ItemUpdate) -> Result<ListItem> {
        let mut cache = self.cache.write().await;
        self.load_if_needed(&mut cache).await?;
        let map = cache.as_mut().unwrap();

        let updated = {
            let items = map
                .get_mut(list_code)
                .ok_or_else(|| TrolleyError::not_found("item", item_id))?;
            let item = items
                .iter_mut()
                .find(|item| item.id == item_id)
                .ok_or_else(|| TrolleyError::not_found("item", item_id))?;
            update.apply_to(item);
            item.clone()
        };
        self.save(map).await?;
        Ok(updated)
    }

    async fn delete(&self, list_code: &str, item_id: &str) -> Result<()> {
        let mut cache = self.cache.write().await;
        self.load_if_needed(&mut cache).await?;
        let map = cache.as_mut().unwrap();

        {
            let items = map
                .get_mut(list_code)
                .ok_or_else(|| TrolleyError::not_found("item", item_id))?;
            let before = items.len();
            items.retain(|item| item.id != item_id);
            if items.len() == before {
                return Err(TrolleyError::not_found("item", item_id));
            }
        }
        self.save(map).await?;
        Ok(())
    }
}
