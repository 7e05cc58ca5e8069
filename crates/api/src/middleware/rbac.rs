//! Capability-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose capability
//! does not meet the minimum requirement. Use these in route handlers to
//! enforce authorization at the type level, before any store mutation.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use annunci_core::moderation::check_moderator;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires moderator capability (`admin` or `editor` role). Rejects with
/// 403 Forbidden otherwise.
///
/// ```ignore
/// async fn moderator_only(RequireModerator(user): RequireModerator) -> AppResult<Json<()>> {
///     // user is guaranteed to hold moderator capability here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireModerator(pub AuthUser);

impl FromRequestParts<AppState> for RequireModerator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        check_moderator(user.capability)?;
        Ok(RequireModerator(user))
    }
}
