//! Core domain types for Trolley: list codes, sessions, items, and the ports
//! their persistence goes through.
//!
//! This crate is I/O free. Storage implementations live in
//! `trolley-infrastructure`, the identity resolver in `trolley-client`, and
//! the HTTP edge in `trolley-server`.

pub mod code;
pub mod error;
pub mod item;
pub mod session;

// Re-export common error type
pub use error::TrolleyError;
