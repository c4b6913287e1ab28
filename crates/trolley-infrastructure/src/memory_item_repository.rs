//! In-memory item repository.
//!
//! Items are partitioned per list code in a map; every operation only ever
//! touches its own partition, which is the whole scoping guarantee this layer
//! provides.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use trolley_core::error::{Result, TrolleyError};
use trolley_core::item::{ItemRepository, ItemUpdate, ListItem};

/// An `ItemRepository` held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryItemRepository {
    lists: Arc<RwLock<HashMap<String, Vec<ListItem>>>>,
}

impl MemoryItemRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for MemoryItemRepository {
    async fn list(&self, list_code: &str) -> Result<Vec<ListItem>> {
        let lists = self.lists.read().await;
        Ok(lists.get(list_code).cloned().unwrap_or_default())
    }

    async fn insert(&self, list_code: &str, name: &str) -> Result<ListItem> {
        let item = ListItem::new(list_code, name);
        let mut lists = self.lists.write().await;
        lists
            .entry(list_code.to_string())
            .or_default()
            .push(item.clone());
        Ok(item)
    }

    async fn update(&self, list_code: &str, item_id: &str, update: ItemUpdate) -> Result<ListItem> {
        let mut lists = self.lists.write().await;
        let items = lists
            .get_mut(list_code)
            .ok_or_else(|| TrolleyError::not_found("item", item_id))?;
        let item = items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| TrolleyError::not_found("item", item_id))?;
        update.apply_to(item);
        Ok(item.clone())
    }

    async fn delete(&self, list_code: &str, item_id: &str) -> Result<()> {
        let mut lists = self.lists.write().await;
        let items = lists
            .get_mut(list_code)
            .ok_or_else(|| TrolleyError::not_found("item", item_id))?;
        let before = items.len();
        items.retain(|item| item.id != item_id);
        if items.len() == before {
            return Err(TrolleyError::not_found("item", item_id));
        }
        Ok(())
    }
}
