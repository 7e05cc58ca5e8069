//! Route definitions for the `/conversations` resource.
//!
//! All endpoints require authentication; per-thread endpoints additionally
//! check participation in the handlers.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{conversation, message};
use crate::state::AppState;
use crate::ws;

/// Routes mounted at `/conversations`.
///
/// ```text
/// GET    /                  -> list (inbox)
/// POST   /                  -> open (find-or-create)
/// GET    /unread-count      -> unread_count
/// POST   /{id}/hide         -> hide
/// GET    /{id}/messages     -> history
/// POST   /{id}/messages     -> send
/// POST   /{id}/read         -> mark_read
/// GET    /{id}/ws           -> conversation_ws (WebSocket)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(conversation::list).post(conversation::open))
        .route("/unread-count", get(conversation::unread_count))
        .route("/{id}/hide", post(conversation::hide))
        .route(
            "/{id}/messages",
            get(message::history).post(message::send),
        )
        .route("/{id}/read", post(message::mark_read))
        .route("/{id}/ws", get(ws::conversation_ws))
}
