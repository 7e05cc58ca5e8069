pub mod conversations;
pub mod health;
pub mod listings;
pub mod moderation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /listings                                 browse approved (public), create
/// /listings/mine                            own listings, any status
/// /listings/{id}                            get, edit (owner), delete
///
/// /moderation/queue                         review queue (moderators)
/// /moderation/listings/{id}/approve         approve (POST)
/// /moderation/listings/{id}/reject          reject with reason (POST)
/// /moderation/listings/{id}/restore         back to pending (POST)
/// /moderation/listings/{id}/archive         archive (POST)
///
/// /conversations                            inbox (GET), open thread (POST)
/// /conversations/unread-count               total unread (GET)
/// /conversations/{id}/hide                  hide from own inbox (POST)
/// /conversations/{id}/messages              history (GET), send (POST)
/// /conversations/{id}/read                  mark thread read (POST)
/// /conversations/{id}/ws                    live feed (WebSocket)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/listings", listings::router())
        .nest("/moderation", moderation::router())
        .nest("/conversations", conversations::router())
}
