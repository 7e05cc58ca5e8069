//! Message entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use annunci_core::types::{DbId, Timestamp};

/// A row from the `messages` table.
///
/// `Deserialize` is derived as well because messages travel over the
/// conversation push channel as JSON frames.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Message {
    pub id: DbId,
    pub conversation_id: DbId,
    pub sender_id: DbId,
    pub body: String,
    pub is_read: bool,
    /// Set only by the non-sender participant, via mark-read.
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
    /// Creation time + the 30-day retention window.
    pub expires_at: Timestamp,
}

/// DTO for sending a message.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessage {
    #[validate(length(min = 1, max = 4000))]
    pub body: String,
}
