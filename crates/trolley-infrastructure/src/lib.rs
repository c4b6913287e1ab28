//! Storage implementations for Trolley's ports.
//!
//! `trolley-core` defines what a key-value store and an item repository look
//! like; this crate provides the in-memory and file-backed versions of both,
//! plus path management for the on-disk layout.

pub mod file_item_repository;
pub mod file_store;
pub mod memory_item_repository;
pub mod memory_store;
pub mod paths;

pub use file_item_repository::FileItemRepository;
pub use file_store::FileKeyValueStore;
pub use memory_item_repository::MemoryItemRepository;
pub use memory_store::MemoryKeyValueStore;
pub use paths::TrolleyPaths;
