use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use trolley_core::item::ItemRepository;
use trolley_infrastructure::{FileItemRepository, MemoryItemRepository};
use trolley_server::{build_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load().context("Failed to load server configuration")?;

    let items: Arc<dyn ItemRepository> = match &config.data_dir {
        Some(dir) => {
            let path = dir.join("items.json");
            tracing::info!(path = %path.display(), "using file-backed item store");
            Arc::new(FileItemRepository::new(path))
        }
        None => {
            tracing::info!("using in-memory item store");
            Arc::new(MemoryItemRepository::new())
        }
    };

    let router = build_router(AppState::new(items));

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    tracing::info!(addr = %config.addr, "trolley server listening");

    axum::serve(listener, router)
        .await
        .context("Server exited with error")?;

    Ok(())
}
