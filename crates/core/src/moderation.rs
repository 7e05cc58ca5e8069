//! The listing moderation state machine.
//!
//! Pure transition checks: the caller reads the listing's current status,
//! asks this module whether an action is legal from it, and only then issues
//! the guarded database update. Status and its accompanying metadata commit
//! together in a single statement (see `ListingRepo`), so a listing is never
//! `approved` with a null `approved_at`, nor `rejected` without a reason.
//!
//! ```text
//! pending ──approve──▶ approved ──archive──▶ archived
//!    │ ▲                  │                     │
//!    │ └──owner edit──────┘                     │
//!  reject                                    restore
//!    ▼ ▲                                        │
//! rejected ──restore──▶ pending ◀───────────────┘
//! ```
//!
//! Hard delete is unconditional and sits outside the machine.

use crate::error::CoreError;
use crate::listing::ListingStatus;
use crate::roles::Capability;

/// A moderator-initiated status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
    Restore,
    Archive,
}

impl ModerationAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ModerationAction::Approve => "approve",
            ModerationAction::Reject => "reject",
            ModerationAction::Restore => "restore",
            ModerationAction::Archive => "archive",
        }
    }

    /// The set of statuses this action may be applied from.
    pub fn allowed_from(self) -> &'static [ListingStatus] {
        match self {
            // Re-approving an already-approved listing is a no-op request
            // and therefore a precondition violation.
            ModerationAction::Approve => &[
                ListingStatus::Pending,
                ListingStatus::Rejected,
                ListingStatus::Archived,
            ],
            // Reject doubles as a corrective action on published listings.
            ModerationAction::Reject => &[
                ListingStatus::Pending,
                ListingStatus::Approved,
                ListingStatus::Archived,
            ],
            ModerationAction::Restore => &[ListingStatus::Rejected, ListingStatus::Archived],
            ModerationAction::Archive => &[
                ListingStatus::Pending,
                ListingStatus::Approved,
                ListingStatus::Rejected,
            ],
        }
    }

    /// The status this action lands in.
    pub fn target(self) -> ListingStatus {
        match self {
            ModerationAction::Approve => ListingStatus::Approved,
            ModerationAction::Reject => ListingStatus::Rejected,
            ModerationAction::Restore => ListingStatus::Pending,
            ModerationAction::Archive => ListingStatus::Archived,
        }
    }
}

/// Check that `action` is legal from `current`.
///
/// A wrong-state transition is a precondition violation, surfaced as a
/// conflict and never retried.
pub fn check_transition(current: ListingStatus, action: ModerationAction) -> Result<(), CoreError> {
    if action.allowed_from().contains(&current) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot {} a listing in status '{}'",
            action.as_str(),
            current.as_str()
        )))
    }
}

/// Check that the caller holds moderator capability.
pub fn check_moderator(capability: Capability) -> Result<(), CoreError> {
    if capability.is_moderator() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Moderator capability required".into(),
        ))
    }
}

/// Validate the reason accompanying a rejection. A reject with an empty
/// reason is a validation failure and must not reach the store.
pub fn validate_rejection_reason(reason: &str) -> Result<(), CoreError> {
    if reason.trim().is_empty() {
        return Err(CoreError::Validation(
            "A rejection must include a non-empty reason".into(),
        ));
    }
    Ok(())
}

/// Whether the owner may edit a listing in this status.
///
/// Editing an archived listing is not allowed; editing a rejected one is
/// (the edit resets it to `pending` for a fresh review). Any owner edit of
/// a published listing likewise forces re-review.
pub fn edit_allowed(status: ListingStatus) -> bool {
    matches!(
        status,
        ListingStatus::Pending | ListingStatus::Approved | ListingStatus::Rejected
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ListingStatus::*;
    use ModerationAction::*;

    #[test]
    fn test_approve_from_pending_rejected_archived() {
        assert!(check_transition(Pending, Approve).is_ok());
        assert!(check_transition(Rejected, Approve).is_ok());
        assert!(check_transition(Archived, Approve).is_ok());
    }

    #[test]
    fn test_approve_from_approved_is_conflict() {
        let err = check_transition(Approved, Approve).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn test_reject_from_any_non_rejected_state() {
        assert!(check_transition(Pending, Reject).is_ok());
        assert!(check_transition(Approved, Reject).is_ok());
        assert!(check_transition(Archived, Reject).is_ok());
        assert!(check_transition(Rejected, Reject).is_err());
    }

    #[test]
    fn test_restore_only_from_rejected_or_archived() {
        assert!(check_transition(Rejected, Restore).is_ok());
        assert!(check_transition(Archived, Restore).is_ok());
        assert!(check_transition(Pending, Restore).is_err());
        assert!(check_transition(Approved, Restore).is_err());
    }

    #[test]
    fn test_archive_from_any_state_except_archived() {
        assert!(check_transition(Pending, Archive).is_ok());
        assert!(check_transition(Approved, Archive).is_ok());
        assert!(check_transition(Rejected, Archive).is_ok());
        assert!(check_transition(Archived, Archive).is_err());
    }

    #[test]
    fn test_targets() {
        assert_eq!(Approve.target(), Approved);
        assert_eq!(Reject.target(), Rejected);
        assert_eq!(Restore.target(), Pending);
        assert_eq!(Archive.target(), Archived);
    }

    #[test]
    fn test_empty_rejection_reason_is_validation_failure() {
        assert!(matches!(
            validate_rejection_reason("").unwrap_err(),
            CoreError::Validation(_)
        ));
        assert!(validate_rejection_reason("   ").is_err());
        assert!(validate_rejection_reason("incomplete photos").is_ok());
    }

    #[test]
    fn test_edit_allowed_except_archived() {
        assert!(edit_allowed(Pending));
        assert!(edit_allowed(Approved));
        assert!(edit_allowed(Rejected));
        assert!(!edit_allowed(Archived));
    }

    #[test]
    fn test_member_capability_is_forbidden() {
        use crate::roles::Capability;
        assert!(check_moderator(Capability::Moderator).is_ok());
        assert!(matches!(
            check_moderator(Capability::Member).unwrap_err(),
            CoreError::Forbidden(_)
        ));
    }
}
