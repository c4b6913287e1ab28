//! Error types for the Trolley application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Trolley application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum TrolleyError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A candidate list code failed format validation
    #[error("Invalid list code: {reason}")]
    InvalidCode { reason: String },

    /// A request reached a scoped endpoint without its scope parameter
    #[error("Missing required parameter: {parameter}")]
    MissingScopeKey { parameter: &'static str },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Storage layer error (the durable store is unavailable or rejected the
    /// operation); callers are expected to degrade, not abort
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An API call returned a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrolleyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an InvalidCode error
    pub fn invalid_code(reason: impl Into<String>) -> Self {
        Self::InvalidCode {
            reason: reason.into(),
        }
    }

    /// Creates a MissingScopeKey error
    pub fn missing_scope_key(parameter: &'static str) -> Self {
        Self::MissingScopeKey { parameter }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Api error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an InvalidCode error
    pub fn is_invalid_code(&self) -> bool {
        matches!(self, Self::InvalidCode { .. })
    }

    /// Check if this is a MissingScopeKey error
    pub fn is_missing_scope_key(&self) -> bool {
        matches!(self, Self::MissingScopeKey { .. })
    }

    /// Check if this is a Storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Check if this error indicates the durable store is unusable.
    ///
    /// Returns true for:
    /// - `Storage` errors
    /// - `Io` errors
    ///
    /// The identity resolver uses this to decide whether to fall back to an
    /// in-memory-only session.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TrolleyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TrolleyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TrolleyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TrolleyError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (transitional, should be removed eventually)
impl From<anyhow::Error> for TrolleyError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Conversion from String (for error messages)
impl From<String> for TrolleyError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, TrolleyError>`.
pub type Result<T> = std::result::Result<T, TrolleyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_scope_key_message_names_parameter() {
        let err = TrolleyError::missing_scope_key("user_session");
        assert!(err.to_string().contains("user_session"));
        assert!(err.is_missing_scope_key());
    }

    #[test]
    fn test_storage_unavailable_covers_io_and_storage() {
        assert!(TrolleyError::storage("quota exceeded").is_storage_unavailable());
        let io: TrolleyError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(io.is_storage_unavailable());
        assert!(!TrolleyError::invalid_code("too short").is_storage_unavailable());
    }
}
