//! Handlers for the `/listings` resource.
//!
//! Creation and editing are owner operations; browsing is public but only
//! ever sees approved listings. Owner edits force the listing back to
//! `pending` for re-review.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use annunci_core::error::CoreError;
use annunci_core::listing::{validate_content, ListingKind, ListingStatus};
use annunci_core::moderation;
use annunci_core::types::DbId;
use annunci_db::models::listing::{CreateListing, EditListing, Listing, ListingDetail};
use annunci_db::repositories::ListingRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for the public browse endpoint.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    /// Optional kind filter: `property` or `product`.
    pub kind: Option<String>,
}

/// POST /api/v1/listings
///
/// Create a listing in `pending` status. Any authenticated user may submit.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateListing>,
) -> AppResult<(StatusCode, Json<ListingDetail>)> {
    input.validate()?;
    validate_content(&input.title, &input.description, input.images.len())?;
    input.attributes.validate()?;

    let detail = ListingRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        listing_id = detail.listing.id,
        owner_id = auth.user_id,
        kind = %detail.listing.kind,
        "Listing submitted for review"
    );
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/listings
///
/// Public browse: approved listings only, optionally filtered by kind.
pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<BrowseQuery>,
) -> AppResult<Json<Vec<Listing>>> {
    let kind = match params.kind.as_deref() {
        Some(k) => Some(ListingKind::parse(k)?),
        None => None,
    };
    let listings = ListingRepo::list_by_status(
        &state.pool,
        ListingStatus::Approved.as_str(),
        kind.map(ListingKind::as_str),
    )
    .await?;
    Ok(Json(listings))
}

/// GET /api/v1/listings/mine
///
/// The authenticated user's own listings, any status.
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Listing>>> {
    let listings = ListingRepo::list_by_owner(&state.pool, auth.user_id).await?;
    Ok(Json(listings))
}

/// GET /api/v1/listings/{id}
///
/// The owner and moderators see the listing in any status; everyone else
/// only sees it once approved (a non-visible listing reads as 404 so its
/// existence does not leak).
pub async fn get_by_id(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ListingDetail>> {
    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        }))?;

    let privileged = auth
        .as_ref()
        .is_some_and(|u| u.user_id == listing.owner_id || u.capability.is_moderator());
    if listing.status()? != ListingStatus::Approved && !privileged {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        }));
    }

    let images = ListingRepo::images_for(&state.pool, id).await?;
    Ok(Json(ListingDetail { listing, images }))
}

/// PUT /api/v1/listings/{id}
///
/// Owner edit: content and image set replaced as a unit, status forced
/// back to `pending`. Not allowed on archived listings.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EditListing>,
) -> AppResult<Json<ListingDetail>> {
    input.validate()?;
    validate_content(&input.title, &input.description, input.images.len())?;
    input.attributes.validate()?;

    let current = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        }))?;

    if current.owner_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner may edit a listing".into(),
        )));
    }

    let status = current.status()?;
    if !moderation::edit_allowed(status) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot edit a listing in status '{}'",
            status.as_str()
        ))));
    }

    // The repo re-checks edit eligibility in its WHERE clause, so a
    // transition that lands between our read and this write surfaces as a
    // conflict instead of overwriting the newer state.
    let detail = ListingRepo::owner_edit(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Listing status changed concurrently; reload and retry".into(),
            ))
        })?;

    tracing::info!(listing_id = id, owner_id = auth.user_id, "Listing edited, re-queued for review");
    Ok(Json(detail))
}

/// DELETE /api/v1/listings/{id}
///
/// Unconditional hard delete, available to the owner and to moderators.
/// Cascades to images, conversations, and messages. Not reversible.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        }))?;

    if listing.owner_id != auth.user_id && !auth.capability.is_moderator() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner or a moderator may delete a listing".into(),
        )));
    }

    ListingRepo::delete(&state.pool, id).await?;
    tracing::info!(listing_id = id, actor = auth.user_id, "Listing deleted");
    Ok(StatusCode::NO_CONTENT)
}
