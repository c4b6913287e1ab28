//! Persisted session record.
//!
//! The durable form of a session, stored as JSON under
//! [`trolley_core::session::SESSION_STORAGE_KEY`]. Besides the active code it
//! remembers the last generated code, so clearing a custom code can restore
//! the identity the user had before claiming it.

use serde::{Deserialize, Serialize};

use trolley_core::code::ListCode;
use trolley_core::session::Session;

/// Current record schema version.
pub const RECORD_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    RECORD_SCHEMA_VERSION
}

/// What the resolver writes to durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Record format version, for future migrations.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// The active list-code value.
    pub session_id: String,
    /// Whether the active code was claimed by the user.
    pub is_custom_list_code: bool,
    /// The last generated code, kept while a custom code is active so that
    /// clearing the custom code restores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_code: Option<String>,
}

impl SessionRecord {
    /// Builds the record for the given session state.
    pub fn new(session: &Session, generated_code: Option<&str>) -> Self {
        Self {
            schema_version: RECORD_SCHEMA_VERSION,
            session_id: session.id().to_string(),
            is_custom_list_code: session.is_custom(),
            generated_code: generated_code.map(str::to_string),
        }
    }

    /// Reconstructs the session this record describes.
    pub fn into_session(self) -> (Session, Option<String>) {
        let code = if self.is_custom_list_code {
            // Claimed codes were validated when they were claimed; a record
            // is trusted as-is rather than re-validated on load.
            ListCode {
                value: self.session_id,
                origin: trolley_core::code::CodeOrigin::Custom,
            }
        } else {
            ListCode::from_generated(self.session_id)
        };
        (Session::new(code), self.generated_code)
    }
}
