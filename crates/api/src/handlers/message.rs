//! Handlers for messages within a conversation.
//!
//! Every route loads the conversation first and checks participation;
//! outsiders get a 403 even for reads. Sends fan out to live WebSocket
//! subscribers through the in-process conversation bus after commit.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use annunci_core::error::CoreError;
use annunci_core::messaging::validate_body;
use annunci_core::types::DbId;
use annunci_db::models::conversation::Conversation;
use annunci_db::models::message::{Message, SendMessage};
use annunci_db::repositories::{ConversationRepo, MessageRepo};
use annunci_events::MessagePush;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked_read: u64,
}

/// GET /api/v1/conversations/{id}/messages
///
/// Full (unexpired) history of the conversation, oldest first.
pub async fn history(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Message>>> {
    load_for_participant(&state, id, auth.user_id).await?;
    let messages = MessageRepo::list_for_conversation(&state.pool, id).await?;
    Ok(Json(messages))
}

/// POST /api/v1/conversations/{id}/messages
///
/// Append a message. The stored row is the source of truth; the push to
/// live subscribers is best-effort on top of it.
pub async fn send(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SendMessage>,
) -> AppResult<(StatusCode, Json<Message>)> {
    input.validate()?;
    validate_body(&input.body)?;
    load_for_participant(&state, id, auth.user_id).await?;

    let message = MessageRepo::create(&state.pool, id, auth.user_id, input.body.trim()).await?;

    state
        .bus
        .publish(MessagePush {
            conversation_id: id,
            message: message.clone(),
        })
        .await;

    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /api/v1/conversations/{id}/read
///
/// Mark every message addressed to the caller in this conversation as
/// read. Idempotent; returns how many messages were newly marked.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    load_for_participant(&state, id, auth.user_id).await?;
    let marked_read = MessageRepo::mark_read(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: MarkedRead { marked_read },
    }))
}

/// Load the conversation and reject callers who are not one of its two
/// parties.
pub(crate) async fn load_for_participant(
    state: &AppState,
    id: DbId,
    user_id: DbId,
) -> AppResult<Conversation> {
    let conversation = ConversationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Conversation",
            id,
        }))?;

    if !conversation.has_participant(user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not a participant in this conversation".into(),
        )));
    }
    Ok(conversation)
}
