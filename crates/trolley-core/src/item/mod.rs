//! Shopping-list items and their persistence port.

pub mod model;
pub mod repository;

pub use model::{ItemUpdate, ListItem};
pub use repository::ItemRepository;
