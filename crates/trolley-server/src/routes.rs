//! Router and request handlers.
//!
//! Every list-data route takes a [`ScopeKey`] first; the extractor has
//! already sent a 400 before a handler body runs for an unscoped request.
//! Health and the 404 fallback are deliberately unscoped.

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use trolley_core::item::{ItemUpdate, ListItem};

use crate::error::{ApiError, ErrorResponse};
use crate::scope::ScopeKey;
use crate::state::AppState;

/// Health check payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Envelope for item listings.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub items: Vec<ListItem>,
    pub total: usize,
}

/// Request body for creating an item.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
}

/// Builds the application router.
///
/// CORS is permissive by design: the client is an unauthenticated web page
/// served from anywhere, and knowledge of a list code is the only access
/// control this API has.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/:id", axum::routing::put(update_item).delete(delete_item))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}

async fn list_items(
    ScopeKey(list_code): ScopeKey,
    State(state): State<AppState>,
) -> Result<Json<ListResponse>, ApiError> {
    let items = state.items.list(&list_code).await?;
    let total = items.len();
    Ok(Json(ListResponse { items, total }))
}

async fn create_item(
    ScopeKey(list_code): ScopeKey,
    State(state): State<AppState>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ListItem>), ApiError> {
    let item = state.items.insert(&list_code, &request.name).await?;
    tracing::debug!(%list_code, item_id = %item.id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    ScopeKey(list_code): ScopeKey,
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(update): Json<ItemUpdate>,
) -> Result<Json<ListItem>, ApiError> {
    let item = state.items.update(&list_code, &item_id, update).await?;
    Ok(Json(item))
}

async fn delete_item(
    ScopeKey(list_code): ScopeKey,
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.items.delete(&list_code, &item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
