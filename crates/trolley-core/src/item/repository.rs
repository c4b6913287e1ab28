//! Item repository trait.
//!
//! Defines the interface for list-item persistence. The list code is the
//! partition key on every operation; the repository performs no ownership or
//! uniqueness checks on it - any caller who knows a code operates on that
//! list.

use async_trait::async_trait;

use super::model::{ItemUpdate, ListItem};
use crate::error::Result;

/// Repository for list-item persistence, keyed by list code.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Returns all items on the given list, oldest first.
    async fn list(&self, list_code: &str) -> Result<Vec<ListItem>>;

    /// Adds a new item to the given list.
    async fn insert(&self, list_code: &str, name: &str) -> Result<ListItem>;

    /// Applies a partial update to an item on the given list.
    ///
    /// # Returns
    ///
    /// - `Ok(item)`: the updated item
    /// - `Err(NotFound)`: no such item on that list
    async fn update(&self, list_code: &str, item_id: &str, update: ItemUpdate) -> Result<ListItem>;

    /// Removes an item from the given list.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: item removed
    /// - `Err(NotFound)`: no such item on that list
    async fn delete(&self, list_code: &str, item_id: &str) -> Result<()>;
}
