//! Shopping-list item domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry on a shared shopping list.
///
/// Items are partitioned by `list_code`; the identity subsystem supplies that
/// key and the repository treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    /// Unique item identifier (UUID v4).
    pub id: String,
    /// The list code this item belongs to.
    pub list_code: String,
    /// Display name of the item.
    pub name: String,
    /// Whether the item has been checked off.
    pub checked: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ListItem {
    /// Creates a fresh unchecked item on the given list.
    pub fn new(list_code: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            list_code: list_code.into(),
            name: name.into(),
            checked: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update applied to an existing item.
///
/// Absent fields leave the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    /// New display name, if changing.
    pub name: Option<String>,
    /// New checked state, if changing.
    pub checked: Option<bool>,
}

impl ItemUpdate {
    /// Applies this update to an item, bumping its modification timestamp.
    pub fn apply_to(&self, item: &mut ListItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(checked) = self.checked {
            item.checked = checked;
        }
        item.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_defaults() {
        let item = ListItem::new("abc123", "Milk");
        assert_eq!(item.list_code, "abc123");
        assert_eq!(item.name, "Milk");
        assert!(!item.checked);
        assert!(!item.id.is_empty());
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn test_new_items_have_unique_ids() {
        let a = ListItem::new("abc123", "Milk");
        let b = ListItem::new("abc123", "Milk");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut item = ListItem::new("abc123", "Milk");

        ItemUpdate {
            checked: Some(true),
            ..Default::default()
        }
        .apply_to(&mut item);
        assert!(item.checked);
        assert_eq!(item.name, "Milk");

        ItemUpdate {
            name: Some("Oat milk".to_string()),
            ..Default::default()
        }
        .apply_to(&mut item);
        assert_eq!(item.name, "Oat milk");
        assert!(item.checked);
    }
}
