//! HTTP edge for Trolley.
//!
//! The interesting part is [`scope`]: the request-level gate that refuses to
//! touch storage for any list-data call that does not name its scope key.
//! Everything else is a thin CRUD surface over the item repository port.

pub mod config;
pub mod error;
pub mod routes;
pub mod scope;
pub mod state;

pub use config::ServerConfig;
pub use routes::build_router;
pub use state::AppState;
