//! HTTP client for the Trolley API.
//!
//! Thin wrapper around `reqwest` that attaches the resolved session id as the
//! `user_session` query parameter on every list-data call. The server rejects
//! anything without that parameter, so all requests go through here.

use std::sync::Arc;

use serde::Deserialize;

use trolley_core::error::{Result, TrolleyError};
use trolley_core::item::{ItemUpdate, ListItem};
use trolley_core::session::SCOPE_PARAM;

use crate::resolver::SessionResolver;

#[derive(Debug, Deserialize)]
struct ItemsEnvelope {
    items: Vec<ListItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

/// API client bound to one session resolver.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    resolver: Arc<SessionResolver>,
}

impl ApiClient {
    /// Creates a client for the server at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, resolver: Arc<SessionResolver>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            resolver,
        }
    }

    /// The resolver this client attaches to requests.
    pub fn resolver(&self) -> &Arc<SessionResolver> {
        &self.resolver
    }

    /// Checks server health. Unscoped.
    pub async fn health(&self) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;
        let body: HealthBody = Self::parse(response).await?;
        Ok(body.status)
    }

    /// Fetches all items on the active list.
    pub async fn list_items(&self) -> Result<Vec<ListItem>> {
        let session_id = self.resolver.resolve_session_id().await;
        let response = self
            .http
            .get(format!("{}/api/items", self.base_url))
            .query(&[(SCOPE_PARAM, session_id.as_str())])
            .send()
            .await
            .map_err(transport_error)?;
        let body: ItemsEnvelope = Self::parse(response).await?;
        Ok(body.items)
    }

    /// Adds an item to the active list.
    pub async fn add_item(&self, name: &str) -> Result<ListItem> {
        let session_id = self.resolver.resolve_session_id().await;
        let response = self
            .http
            .post(format!("{}/api/items", self.base_url))
            .query(&[(SCOPE_PARAM, session_id.as_str())])
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(transport_error)?;
        Self::parse(response).await
    }

    /// Applies a partial update to an item on the active list.
    pub async fn update_item(&self, item_id: &str, update: &ItemUpdate) -> Result<ListItem> {
        let session_id = self.resolver.resolve_session_id().await;
        let response = self
            .http
            .put(format!("{}/api/items/{}", self.base_url, item_id))
            .query(&[(SCOPE_PARAM, session_id.as_str())])
            .json(update)
            .send()
            .await
            .map_err(transport_error)?;
        Self::parse(response).await
    }

    /// Removes an item from the active list.
    pub async fn delete_item(&self, item_id: &str) -> Result<()> {
        let session_id = self.resolver.resolve_session_id().await;
        let response = self
            .http
            .delete(format!("{}/api/items/{}", self.base_url, item_id))
            .query(&[(SCOPE_PARAM, session_id.as_str())])
            .send()
            .await
            .map_err(transport_error)?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::api_error(response).await)
    }

    /// Deserializes a success body, or surfaces the server's error.
    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        response.json::<T>().await.map_err(|e| {
            TrolleyError::Serialization {
                format: "JSON".to_string(),
                message: e.to_string(),
            }
        })
    }

    async fn api_error(response: reqwest::Response) -> TrolleyError {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => "unparseable error response".to_string(),
        };
        TrolleyError::api(status, message)
    }
}

fn transport_error(err: reqwest::Error) -> TrolleyError {
    TrolleyError::io(format!("HTTP transport error: {}", err))
}
