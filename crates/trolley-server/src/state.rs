//! Shared handler state.

use std::sync::Arc;

use trolley_core::item::ItemRepository;

/// State injected into every handler.
///
/// Handlers only see the repository port; which implementation backs it is
/// decided at startup from configuration.
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<dyn ItemRepository>,
}

impl AppState {
    pub fn new(items: Arc<dyn ItemRepository>) -> Self {
        Self { items }
    }
}
