//! User entity model.
//!
//! Accounts are provisioned by the external identity provider; this row is
//! the authoritative per-request role lookup (roles are never trusted from
//! the access token).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use annunci_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    /// Role name: `admin`, `editor`, `inserzionista`, or `viewer`.
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
    pub role: String,
}
