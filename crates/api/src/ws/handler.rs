use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use annunci_core::types::DbId;
use annunci_db::models::message::Message;
use annunci_events::MessagePush;

use crate::error::AppResult;
use crate::handlers::message::load_for_participant;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Keepalive interval; intermediaries tend to drop idle upgraded
/// connections after about a minute.
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Outbound frame envelope.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Frame<'a> {
    /// A message stored in this conversation.
    Message { message: &'a Message },
    /// The subscriber fell behind the channel; it should re-fetch the
    /// history over HTTP to close the gap.
    Resync { skipped: u64 },
}

/// GET /api/v1/conversations/{id}/ws
///
/// Upgrade to a live feed of the conversation. Participants only; the
/// subscription is taken before the upgrade so no message sent during the
/// handshake is missed.
pub async fn conversation_ws(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ws: WebSocketUpgrade,
) -> AppResult<impl IntoResponse> {
    load_for_participant(&state, id, auth.user_id).await?;
    let rx = state.bus.subscribe(id).await;

    Ok(ws.on_upgrade(move |socket| run_socket(socket, rx, id, auth.user_id)))
}

/// Drive one upgraded connection: forward bus pushes, answer with pings on
/// an interval, and shut down when either side closes.
async fn run_socket(socket: WebSocket, mut rx: Receiver<MessagePush>, conversation_id: DbId, user_id: DbId) {
    tracing::info!(conversation_id, user_id, "Conversation socket connected");

    let (mut sink, mut stream) = socket.split();
    let mut ping = tokio::time::interval(PING_INTERVAL);
    ping.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            push = rx.recv() => {
                let frame = match &push {
                    Ok(push) => serde_json::to_string(&Frame::Message { message: &push.message }),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(conversation_id, user_id, skipped, "Subscriber lagged, asking for resync");
                        serde_json::to_string(&Frame::Resync { skipped: *skipped })
                    }
                    Err(RecvError::Closed) => break,
                };
                let frame = match frame {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!(conversation_id, error = %e, "Frame serialization failed");
                        continue;
                    }
                };
                if sink.send(WsMessage::Text(frame.into())).await.is_err() {
                    break;
                }
            }
            _ = ping.tick() => {
                if sink.send(WsMessage::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(WsMessage::Pong(_))) => {
                        tracing::trace!(conversation_id, user_id, "Pong received");
                    }
                    Some(Ok(_)) => {
                        // Sends go through the HTTP endpoint; inbound data
                        // frames are ignored.
                    }
                    Some(Err(e)) => {
                        tracing::debug!(conversation_id, user_id, error = %e, "Socket receive error");
                        break;
                    }
                }
            }
        }
    }

    tracing::info!(conversation_id, user_id, "Conversation socket disconnected");
}
