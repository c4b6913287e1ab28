//! Session domain model.
//!
//! A session is the resolved identity for one client context: the list code
//! currently in effect plus whether it was claimed by the user. Exactly one
//! session is active per context at a time; the session id is the foreign
//! scoping key for every list record in storage.

use serde::{Deserialize, Serialize};

use crate::code::{CodeOrigin, ListCode};

/// The resolved, currently-active identity for a client context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    code: ListCode,
}

impl Session {
    /// Creates a session from an already-resolved list code.
    pub fn new(code: ListCode) -> Self {
        Self { code }
    }

    /// Creates a session around a fresh generated code.
    pub fn generated() -> Self {
        Self::new(ListCode::generated())
    }

    /// The session id, i.e. the active list-code value.
    pub fn id(&self) -> &str {
        &self.code.value
    }

    /// Whether the active code was claimed by the user.
    pub fn is_custom(&self) -> bool {
        self.code.is_custom()
    }

    /// The active list code.
    pub fn code(&self) -> &ListCode {
        &self.code
    }

    /// Read-only snapshot for the UI and the API client.
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.code.value.clone(),
            is_custom_list_code: self.code.origin == CodeOrigin::Custom,
        }
    }
}

/// Snapshot of the current session, safe to hand across boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// The active list-code value.
    pub session_id: String,
    /// Whether the active code was claimed by the user.
    pub is_custom_list_code: bool,
}
