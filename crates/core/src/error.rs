//! Domain-level error type.
//!
//! `CoreError` is what the pure rule checks (moderation transitions,
//! capability checks, message validation) return; the API layer maps each
//! variant onto an HTTP status and a stable error code. Storage-level
//! failures never surface here, they stay `sqlx::Error` until the API
//! boundary classifies them.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A listing, conversation, or user that the caller referenced does
    /// not exist (or must appear not to, e.g. an unapproved listing read
    /// by a stranger).
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Input rejected before it reaches the store: blank message body,
    /// malformed attributes, a reject without a reason.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation is not legal from the entity's current state, such
    /// as a moderation transition on a listing that already moved on, or
    /// contacting a listing that is not approved.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No usable identity on the request.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is known but lacks the capability: non-moderators on
    /// queue routes, non-participants on a conversation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
