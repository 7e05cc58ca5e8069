//! Conversation entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use annunci_core::types::{DbId, Timestamp};

/// A row from the `conversations` table.
///
/// The participant pair is stored canonically: `party_a < party_b`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conversation {
    pub id: DbId,
    pub listing_id: DbId,
    pub party_a: DbId,
    pub party_b: DbId,
    pub last_activity_at: Timestamp,
    pub hidden_by_a: bool,
    pub hidden_by_b: bool,
    pub created_at: Timestamp,
}

impl Conversation {
    /// Whether `user_id` is one of the two participants.
    pub fn has_participant(&self, user_id: DbId) -> bool {
        annunci_core::messaging::is_participant(self.party_a, self.party_b, user_id)
    }
}

/// DTO for opening (find-or-create) a conversation against a listing.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenConversation {
    pub listing_id: DbId,
}

/// One entry of a user's conversation list: the conversation, its listing
/// title, the most recent message, and the unread count addressed to the
/// requesting user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationSummary {
    pub id: DbId,
    pub listing_id: DbId,
    pub listing_title: String,
    pub party_a: DbId,
    pub party_b: DbId,
    pub last_activity_at: Timestamp,
    pub last_message_body: Option<String>,
    pub last_message_sender_id: Option<DbId>,
    pub last_message_at: Option<Timestamp>,
    pub unread_count: i64,
}
