//! Well-known role name constants and the capability model.
//!
//! Roles live in the `users.role` column and are looked up per request;
//! they are never trusted from the access token itself. Handlers derive a
//! [`Capability`] once at the entry point and pass it down, so the
//! moderation engine stays testable without a live identity provider.

/// Full site administrator.
pub const ROLE_ADMIN: &str = "admin";

/// Content moderator: may review and transition listings.
pub const ROLE_EDITOR: &str = "editor";

/// Advertiser: may publish listings and message buyers.
pub const ROLE_INSERZIONISTA: &str = "inserzionista";

/// Read-mostly account: may browse and contact sellers.
pub const ROLE_VIEWER: &str = "viewer";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_EDITOR, ROLE_INSERZIONISTA, ROLE_VIEWER];

/// What a caller is allowed to do, derived from their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// `admin` or `editor`: may transition any listing's status.
    Moderator,
    /// Everyone else: limited to their own listings and conversations.
    Member,
}

impl Capability {
    /// Derive the capability for a role name. Unknown roles get the most
    /// restricted capability.
    pub fn from_role(role: &str) -> Self {
        if role == ROLE_ADMIN || role == ROLE_EDITOR {
            Capability::Moderator
        } else {
            Capability::Member
        }
    }

    pub fn is_moderator(self) -> bool {
        self == Capability::Moderator
    }
}
