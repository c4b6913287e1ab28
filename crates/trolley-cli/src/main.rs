use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trolley_client::{ApiClient, SessionResolver};
use trolley_core::item::ItemUpdate;
use trolley_infrastructure::{FileKeyValueStore, TrolleyPaths};

#[derive(Parser)]
#[command(name = "trolley")]
#[command(about = "Trolley CLI - shared shopping lists by list code", long_about = None)]
struct Cli {
    /// Server base URL
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// List code from a shared link; takes precedence over the stored session
    #[arg(long)]
    code: Option<String>,

    /// Session storage directory (default ~/.trolley)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the active session and server health
    Status,
    /// Claim a custom list code (share it to share the list)
    Claim { code: String },
    /// Drop the custom code and go back to a generated one
    Clear,
    /// Start a brand-new list with a fresh generated code
    NewSession,
    /// Show the items on the active list
    List,
    /// Add an item
    Add { name: String },
    /// Check an item off
    Check { id: String },
    /// Un-check an item
    Uncheck { id: String },
    /// Remove an item
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let store = match &cli.data_dir {
        Some(dir) => FileKeyValueStore::new(TrolleyPaths::new(dir).storage_file()),
        None => FileKeyValueStore::default_location()?,
    };
    let resolver = Arc::new(SessionResolver::with_link_code(
        Arc::new(store),
        cli.code.clone(),
    ));
    let client = ApiClient::new(cli.server.clone(), resolver);

    match cli.command {
        Commands::Status => {
            let info = client.resolver().session_info().await;
            println!("List code: {}", info.session_id);
            println!(
                "Origin:    {}",
                if info.is_custom_list_code {
                    "custom (shared by code)"
                } else {
                    "generated"
                }
            );
            match client.health().await {
                Ok(status) => println!("Server:    {} ({})", cli.server, status),
                Err(e) => println!("Server:    {} (unreachable: {})", cli.server, e),
            }
        }
        Commands::Claim { code } => {
            let info = client.resolver().set_custom_list_code(&code).await?;
            println!("✅ Claimed list code '{}'", info.session_id);
            println!("Anyone who claims the same code shares this list.");
        }
        Commands::Clear => {
            let info = client.resolver().clear_custom_list_code().await?;
            println!("Back on generated list code '{}'", info.session_id);
        }
        Commands::NewSession => {
            let info = client.resolver().generate_new_session().await?;
            println!("Started new list with code '{}'", info.session_id);
        }
        Commands::List => {
            let items = client.list_items().await?;
            if items.is_empty() {
                println!("(list is empty)");
            }
            for item in items {
                let mark = if item.checked { "x" } else { " " };
                println!("[{}] {}  {}", mark, item.name, item.id);
            }
        }
        Commands::Add { name } => {
            let item = client.add_item(&name).await?;
            println!("Added '{}' ({})", item.name, item.id);
        }
        Commands::Check { id } => {
            set_checked(&client, &id, true).await?;
            println!("Checked off {}", id);
        }
        Commands::Uncheck { id } => {
            set_checked(&client, &id, false).await?;
            println!("Unchecked {}", id);
        }
        Commands::Remove { id } => {
            client.delete_item(&id).await?;
            println!("Removed {}", id);
        }
    }

    Ok(())
}

async fn set_checked(client: &ApiClient, id: &str, checked: bool) -> Result<()> {
    client
        .update_item(
            id,
            &ItemUpdate {
                checked: Some(checked),
                ..Default::default()
            },
        )
        .await?;
    Ok(())
}
