//! Domain logic for the annunci classifieds marketplace.
//!
//! This crate is pure: no I/O, no database access. It holds the listing
//! moderation state machine, the capability model, content validation for
//! the two listing kinds, and the messaging rules (participants, body
//! validation, retention window). The `db` and `api` crates depend on it;
//! it depends on nothing but serde/chrono.

pub mod error;
pub mod listing;
pub mod messaging;
pub mod moderation;
pub mod roles;
pub mod types;

pub use error::CoreError;
