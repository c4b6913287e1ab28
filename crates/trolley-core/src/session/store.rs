//! Durable client storage port.
//!
//! The identity resolver persists the active session through this interface
//! so the precedence/decision logic stays testable without any real storage
//! dependency. Implementations live in `trolley-infrastructure`.

use async_trait::async_trait;

use crate::error::Result;

/// Well-known key under which the resolver persists its session record.
pub const SESSION_STORAGE_KEY: &str = "trolley.session";

/// A minimal durable key-value store.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Treat values as opaque strings (callers handle serialization)
/// - Return `Ok(None)` from `get` for absent keys, reserving `Err` for a
///   store that is actually unusable
/// - Make `remove` succeed on absent keys
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: key present
    /// - `Ok(None)`: key absent
    /// - `Err(_)`: the store is unavailable
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes the value under `key`, if any.
    async fn remove(&self, key: &str) -> Result<()>;
}
