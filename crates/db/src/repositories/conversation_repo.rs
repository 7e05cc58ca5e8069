//! Repository for the `conversations` table.
//!
//! The directory's single invariant: at most one conversation per
//! (unordered participant pair, listing). Callers normalize the pair with
//! `annunci_core::messaging::canonical_pair` before reaching this layer;
//! the `uq_conversations_pair_listing` constraint settles concurrent
//! first-contact races so the loser's insert resolves to the winner's row.

use sqlx::PgPool;

use annunci_core::types::DbId;

use crate::models::conversation::{Conversation, ConversationSummary};

/// Column list for conversations queries.
const COLUMNS: &str =
    "id, listing_id, party_a, party_b, last_activity_at, hidden_by_a, hidden_by_b, created_at";

/// Provides find-or-create and listing operations for conversations.
pub struct ConversationRepo;

impl ConversationRepo {
    /// Find or create the conversation for a canonical pair and listing.
    ///
    /// The no-op `DO UPDATE` makes the statement return the existing row on
    /// conflict, so both sides of a race observe the same conversation.
    pub async fn get_or_create(
        pool: &PgPool,
        listing_id: DbId,
        party_a: DbId,
        party_b: DbId,
    ) -> Result<Conversation, sqlx::Error> {
        let query = format!(
            "INSERT INTO conversations (listing_id, party_a, party_b)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_conversations_pair_listing
             DO UPDATE SET party_a = conversations.party_a
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Conversation>(&query)
            .bind(listing_id)
            .bind(party_a)
            .bind(party_b)
            .fetch_one(pool)
            .await
    }

    /// Find a conversation by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Conversation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM conversations WHERE id = $1");
        sqlx::query_as::<_, Conversation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's conversations, most recently active first.
    ///
    /// Each entry carries the listing title, the most recent message, and
    /// the count of unread messages addressed to the user. Conversations
    /// the user has hidden are excluded, as are expired messages.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ConversationSummary>, sqlx::Error> {
        sqlx::query_as::<_, ConversationSummary>(
            "SELECT
                c.id,
                c.listing_id,
                l.title AS listing_title,
                c.party_a,
                c.party_b,
                c.last_activity_at,
                lm.body AS last_message_body,
                lm.sender_id AS last_message_sender_id,
                lm.created_at AS last_message_at,
                COALESCE(ur.unread, 0) AS unread_count
             FROM conversations c
             JOIN listings l ON l.id = c.listing_id
             LEFT JOIN LATERAL (
                 SELECT m.body, m.sender_id, m.created_at
                 FROM messages m
                 WHERE m.conversation_id = c.id AND m.expires_at > now()
                 ORDER BY m.created_at DESC, m.id DESC
                 LIMIT 1
             ) lm ON true
             LEFT JOIN LATERAL (
                 SELECT COUNT(*) AS unread
                 FROM messages m
                 WHERE m.conversation_id = c.id
                   AND m.sender_id <> $1
                   AND m.is_read = false
                   AND m.expires_at > now()
             ) ur ON true
             WHERE (c.party_a = $1 AND NOT c.hidden_by_a)
                OR (c.party_b = $1 AND NOT c.hidden_by_b)
             ORDER BY c.last_activity_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Hide a conversation for one participant (archive, not destroy).
    ///
    /// Returns `false` if the conversation does not exist or the user is
    /// not a participant.
    pub async fn hide(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE conversations SET
                hidden_by_a = CASE WHEN party_a = $2 THEN true ELSE hidden_by_a END,
                hidden_by_b = CASE WHEN party_b = $2 THEN true ELSE hidden_by_b END
             WHERE id = $1 AND (party_a = $2 OR party_b = $2)",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
