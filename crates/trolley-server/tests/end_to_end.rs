//! Client-to-server tests over a live socket: the resolver supplies the
//! scope key, the API client attaches it, and two devices sharing a custom
//! code see one list.

use std::net::SocketAddr;
use std::sync::Arc;

use trolley_client::{ApiClient, SessionResolver};
use trolley_core::item::ItemUpdate;
use trolley_infrastructure::{MemoryItemRepository, MemoryKeyValueStore};
use trolley_server::{build_router, AppState};

async fn spawn_server() -> SocketAddr {
    let router = build_router(AppState::new(Arc::new(MemoryItemRepository::new())));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> ApiClient {
    let resolver = Arc::new(SessionResolver::new(Arc::new(MemoryKeyValueStore::new())));
    ApiClient::new(format!("http://{addr}"), resolver)
}

#[tokio::test]
async fn health_round_trip() {
    let addr = spawn_server().await;
    let client = client_for(addr);

    assert_eq!(client.health().await.unwrap(), "healthy");
}

#[tokio::test]
async fn items_are_scoped_to_the_resolved_session() {
    let addr = spawn_server().await;

    let alice = client_for(addr);
    let bob = client_for(addr);

    alice.add_item("Milk").await.unwrap();

    // Bob resolved a different generated code, so he sees an empty list
    assert!(bob.list_items().await.unwrap().is_empty());
    assert_eq!(alice.list_items().await.unwrap().len(), 1);
}

#[tokio::test]
async fn shared_custom_code_shares_the_list() {
    let addr = spawn_server().await;

    let alice = client_for(addr);
    let bob = client_for(addr);

    alice
        .resolver()
        .set_custom_list_code("family-groceries")
        .await
        .unwrap();
    bob.resolver()
        .set_custom_list_code("family-groceries")
        .await
        .unwrap();

    let item = alice.add_item("Eggs").await.unwrap();

    let seen = bob.list_items().await.unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].id, item.id);

    // Bob checks it off; Alice sees the change
    bob.update_item(
        &item.id,
        &ItemUpdate {
            checked: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(alice.list_items().await.unwrap()[0].checked);

    // Leaving the shared list takes Bob back to his own
    bob.resolver().clear_custom_list_code().await.unwrap();
    assert!(bob.list_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn api_errors_carry_server_message() {
    let addr = spawn_server().await;
    let client = client_for(addr);

    let err = client.delete_item("no-such-id").await.unwrap_err();
    match err {
        trolley_core::TrolleyError::Api { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("no-such-id"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
