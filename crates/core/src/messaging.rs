//! Messaging rules: participants, body validation, retention window.

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Fixed retention horizon after which a message becomes eligible for purge.
pub const MESSAGE_RETENTION_DAYS: i64 = 30;

/// Maximum message body length in characters.
pub const MAX_BODY_LEN: usize = 4000;

/// Compute a message's expiry from its creation time.
pub fn message_expiry(created_at: Timestamp) -> Timestamp {
    created_at + chrono::Duration::days(MESSAGE_RETENTION_DAYS)
}

/// Validate a message body: non-empty after trimming, bounded length.
pub fn validate_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation(
            "Message body must not be empty".into(),
        ));
    }
    if body.chars().count() > MAX_BODY_LEN {
        return Err(CoreError::Validation(format!(
            "Message body must be at most {MAX_BODY_LEN} characters"
        )));
    }
    Ok(())
}

/// Normalize a participant pair to the canonical `(party_a, party_b)`
/// ordering used by the conversations table (`party_a < party_b`).
///
/// The pair is unordered for lookup purposes; storing it canonically is what
/// lets a single uniqueness constraint settle concurrent first-contact races.
pub fn canonical_pair(a: DbId, b: DbId) -> Result<(DbId, DbId), CoreError> {
    if a == b {
        return Err(CoreError::Validation(
            "A conversation requires two distinct participants".into(),
        ));
    }
    if a < b {
        Ok((a, b))
    } else {
        Ok((b, a))
    }
}

/// Whether `user_id` is one of the conversation's two participants.
pub fn is_participant(party_a: DbId, party_b: DbId, user_id: DbId) -> bool {
    user_id == party_a || user_id == party_b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_thirty_days_out() {
        let now = chrono::Utc::now();
        let expiry = message_expiry(now);
        assert_eq!(expiry - now, chrono::Duration::days(30));
    }

    #[test]
    fn test_empty_body_rejected() {
        assert!(validate_body("").is_err());
        assert!(validate_body("  \n ").is_err());
        assert!(validate_body("interested").is_ok());
    }

    #[test]
    fn test_oversized_body_rejected() {
        let body = "x".repeat(MAX_BODY_LEN);
        assert!(validate_body(&body).is_ok());
        let body = "x".repeat(MAX_BODY_LEN + 1);
        assert!(validate_body(&body).is_err());
    }

    #[test]
    fn test_canonical_pair_orders_both_ways() {
        assert_eq!(canonical_pair(7, 3).unwrap(), (3, 7));
        assert_eq!(canonical_pair(3, 7).unwrap(), (3, 7));
    }

    #[test]
    fn test_self_conversation_rejected() {
        assert!(canonical_pair(5, 5).is_err());
    }

    #[test]
    fn test_is_participant() {
        assert!(is_participant(3, 7, 3));
        assert!(is_participant(3, 7, 7));
        assert!(!is_participant(3, 7, 9));
    }
}
