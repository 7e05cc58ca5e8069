//! Handlers for the conversation directory.
//!
//! A conversation is always anchored to an approved listing and always
//! holds exactly two parties: the listing owner and one interested user.
//! Opening is find-or-create, so repeat contact lands in the same thread.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use annunci_core::error::CoreError;
use annunci_core::listing::ListingStatus;
use annunci_core::messaging::canonical_pair;
use annunci_core::types::DbId;
use annunci_db::models::conversation::{Conversation, ConversationSummary, OpenConversation};
use annunci_db::repositories::{ConversationRepo, ListingRepo, MessageRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

/// POST /api/v1/conversations
///
/// Open (or return) the conversation between the caller and the owner of
/// an approved listing. Owners cannot contact their own listing.
pub async fn open(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<OpenConversation>,
) -> AppResult<(StatusCode, Json<Conversation>)> {
    let listing = ListingRepo::find_by_id(&state.pool, input.listing_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: input.listing_id,
        }))?;

    if listing.status()? != ListingStatus::Approved {
        return Err(AppError::Core(CoreError::Conflict(
            "Only approved listings can be contacted".into(),
        )));
    }

    // Errors when the caller is the owner (a pair needs two distinct users).
    let (party_a, party_b) = canonical_pair(auth.user_id, listing.owner_id)?;

    let conversation =
        ConversationRepo::get_or_create(&state.pool, listing.id, party_a, party_b).await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

/// GET /api/v1/conversations
///
/// The caller's inbox: conversations with listing title, latest message
/// preview, and per-thread unread count, most recently active first.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ConversationSummary>>> {
    let conversations = ConversationRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(conversations))
}

/// GET /api/v1/conversations/unread-count
///
/// Total unread messages across all the caller's conversations.
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = MessageRepo::unread_total(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}

/// POST /api/v1/conversations/{id}/hide
///
/// Hide the conversation from the caller's inbox. One-sided: the thread
/// stays fully visible to the other party.
pub async fn hide(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let hidden = ConversationRepo::hide(&state.pool, id, auth.user_id).await?;
    if !hidden {
        // Also covers the non-participant case; no existence leak.
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Conversation",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
