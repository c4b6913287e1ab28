//! Session identity: the resolved list code for one client context.

pub mod model;
pub mod store;

pub use model::{Session, SessionInfo};
pub use store::{KeyValueStore, SESSION_STORAGE_KEY};

/// Query parameter that carries the scope key on every list-data request.
///
/// Part of the API contract between client and server; both sides use this
/// constant.
pub const SCOPE_PARAM: &str = "user_session";
