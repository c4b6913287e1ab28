//! The scope guard.
//!
//! Every list-data endpoint extracts a [`ScopeKey`] before doing anything
//! else. A request without a non-empty `user_session` query parameter is
//! rejected with 400 right here, so no storage access ever happens for an
//! unscoped request. The key itself passes through unmodified - there is no
//! ownership or uniqueness check; knowing a code is what grants access to
//! its list.

use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use trolley_core::session::SCOPE_PARAM;
use trolley_core::TrolleyError;

use crate::error::ErrorResponse;

/// The scope key a request carried, extracted and non-empty.
#[derive(Debug, Clone)]
pub struct ScopeKey(pub String);

#[derive(Debug, Deserialize)]
struct ScopeParams {
    user_session: Option<String>,
}

/// Rejection returned when the scope parameter is missing or empty.
#[derive(Debug)]
pub struct MissingScopeKey;

impl IntoResponse for MissingScopeKey {
    fn into_response(self) -> Response {
        let err = TrolleyError::missing_scope_key(SCOPE_PARAM);
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(err.to_string()))).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ScopeKey
where
    S: Send + Sync,
{
    type Rejection = MissingScopeKey;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) =
            Query::<ScopeParams>::try_from_uri(&parts.uri).map_err(|_| MissingScopeKey)?;
        match params.user_session {
            Some(key) if !key.is_empty() => Ok(ScopeKey(key)),
            _ => Err(MissingScopeKey),
        }
    }
}
