//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use trolley_core::TrolleyError;

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Wraps a domain error with its HTTP representation.
#[derive(Debug)]
pub struct ApiError(pub TrolleyError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            TrolleyError::NotFound { .. } => StatusCode::NOT_FOUND,
            TrolleyError::InvalidCode { .. } | TrolleyError::MissingScopeKey { .. } => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TrolleyError> for ApiError {
    fn from(err: TrolleyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(ErrorResponse::new(self.0.to_string()))).into_response()
    }
}
