//! Handlers for the moderation queue and listing status transitions.
//!
//! All routes here require moderator capability. Transitions are checked
//! against the lifecycle table first so an out-of-order request fails with
//! a conflict before touching the store, then applied with a guarded
//! UPDATE that re-checks the precondition at commit time.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use annunci_core::error::CoreError;
use annunci_core::listing::{ListingKind, ListingStatus};
use annunci_core::moderation::{check_transition, validate_rejection_reason, ModerationAction};
use annunci_core::types::DbId;
use annunci_db::models::listing::Listing;
use annunci_db::repositories::ListingRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireModerator;
use crate::notifications;
use crate::state::AppState;

/// Query parameters for the moderation queue.
#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    /// Status bucket to review; defaults to `pending`.
    pub status: Option<String>,
    /// Optional kind filter: `property` or `product`.
    pub kind: Option<String>,
}

/// Request body for a rejection. The reason is mandatory and is what the
/// owner sees.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

/// GET /api/v1/moderation/queue?status=&kind=
///
/// Listings awaiting review, oldest first. Defaults to the `pending`
/// bucket; any status can be requested to review past decisions.
pub async fn queue(
    RequireModerator(_): RequireModerator,
    State(state): State<AppState>,
    Query(params): Query<QueueQuery>,
) -> AppResult<Json<Vec<Listing>>> {
    let status = ListingStatus::parse(params.status.as_deref().unwrap_or("pending"))?;
    let kind = match params.kind.as_deref() {
        Some(k) => Some(ListingKind::parse(k)?),
        None => None,
    };
    let listings = ListingRepo::list_by_status(
        &state.pool,
        status.as_str(),
        kind.map(ListingKind::as_str),
    )
    .await?;
    Ok(Json(listings))
}

/// POST /api/v1/moderation/listings/{id}/approve
pub async fn approve(
    RequireModerator(moderator): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Listing>> {
    let current = load(&state, id).await?;
    check_transition(current.status()?, ModerationAction::Approve)?;

    let updated = ListingRepo::approve(&state.pool, id, moderator.user_id)
        .await?
        .ok_or_else(concurrent_change)?;

    tracing::info!(listing_id = id, moderator_id = moderator.user_id, "Listing approved");
    notifications::notify_moderation_outcome(&state, &updated);
    Ok(Json(updated))
}

/// POST /api/v1/moderation/listings/{id}/reject
pub async fn reject(
    RequireModerator(moderator): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RejectRequest>,
) -> AppResult<Json<Listing>> {
    validate_rejection_reason(&input.reason)?;
    let current = load(&state, id).await?;
    check_transition(current.status()?, ModerationAction::Reject)?;

    let updated = ListingRepo::reject(&state.pool, id, moderator.user_id, input.reason.trim())
        .await?
        .ok_or_else(concurrent_change)?;

    tracing::info!(listing_id = id, moderator_id = moderator.user_id, "Listing rejected");
    notifications::notify_moderation_outcome(&state, &updated);
    Ok(Json(updated))
}

/// POST /api/v1/moderation/listings/{id}/restore
///
/// Puts a rejected or archived listing back in the pending queue with a
/// clean slate for re-review.
pub async fn restore(
    RequireModerator(moderator): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Listing>> {
    let current = load(&state, id).await?;
    check_transition(current.status()?, ModerationAction::Restore)?;

    let updated = ListingRepo::restore(&state.pool, id)
        .await?
        .ok_or_else(concurrent_change)?;

    tracing::info!(listing_id = id, moderator_id = moderator.user_id, "Listing restored to pending");
    Ok(Json(updated))
}

/// POST /api/v1/moderation/listings/{id}/archive
pub async fn archive(
    RequireModerator(moderator): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Listing>> {
    let current = load(&state, id).await?;
    check_transition(current.status()?, ModerationAction::Archive)?;

    let updated = ListingRepo::archive(&state.pool, id)
        .await?
        .ok_or_else(concurrent_change)?;

    tracing::info!(listing_id = id, moderator_id = moderator.user_id, "Listing archived");
    Ok(Json(updated))
}

async fn load(state: &AppState, id: DbId) -> AppResult<Listing> {
    ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        }))
}

fn concurrent_change() -> AppError {
    AppError::Core(CoreError::Conflict(
        "Listing status changed concurrently; reload and retry".into(),
    ))
}
