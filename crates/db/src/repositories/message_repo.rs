//! Repository for the `messages` table.
//!
//! Read paths are purge-aware: messages past their `expires_at` are never
//! returned even if the background sweeper has not caught up yet. The
//! sweeper itself is advisory and not required for read/unread semantics.

use sqlx::PgPool;

use annunci_core::messaging::MESSAGE_RETENTION_DAYS;
use annunci_core::types::DbId;

use crate::models::message::Message;

/// Column list for messages queries.
const COLUMNS: &str =
    "id, conversation_id, sender_id, body, is_read, read_at, created_at, expires_at";

/// Provides append, read-state, and retention operations for messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Append a message and bump the conversation's `last_activity_at`, in
    /// one transaction. The expiry is creation time + the retention window.
    pub async fn create(
        pool: &PgPool,
        conversation_id: DbId,
        sender_id: DbId,
        body: &str,
    ) -> Result<Message, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO messages (conversation_id, sender_id, body, expires_at)
             VALUES ($1, $2, $3, now() + make_interval(days => $4))
             RETURNING {COLUMNS}"
        );
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(conversation_id)
            .bind(sender_id)
            .bind(body)
            .bind(MESSAGE_RETENTION_DAYS as i32)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE conversations SET last_activity_at = $2 WHERE id = $1")
            .bind(conversation_id)
            .bind(message.created_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::trace!(
            message_id = message.id,
            conversation_id,
            "Message appended, conversation activity bumped"
        );
        Ok(message)
    }

    /// Message history for a conversation, oldest first. Ordering is by
    /// creation time with the id as tie-break; expired messages excluded.
    pub async fn list_for_conversation(
        pool: &PgPool,
        conversation_id: DbId,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE conversation_id = $1 AND expires_at > now()
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(conversation_id)
            .fetch_all(pool)
            .await
    }

    /// Mark every message addressed to `reader_id` in the conversation as
    /// read. Idempotent: already-read messages are untouched, so re-invoking
    /// has no further effect. Returns the number of newly read messages.
    pub async fn mark_read(
        pool: &PgPool,
        conversation_id: DbId,
        reader_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = true, read_at = now()
             WHERE conversation_id = $1
               AND sender_id <> $2
               AND is_read = false",
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Total unread messages addressed to a user across all their
    /// conversations. Feeds the unread-count signal in the UI header.
    pub async fn unread_total(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM messages m
             JOIN conversations c ON c.id = m.conversation_id
             WHERE (c.party_a = $1 OR c.party_b = $1)
               AND m.sender_id <> $1
               AND m.is_read = false
               AND m.expires_at > now()",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Delete all messages past their retention horizon. Returns the number
    /// of purged rows.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM messages WHERE expires_at <= now()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
