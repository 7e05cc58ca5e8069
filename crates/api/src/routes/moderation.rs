//! Route definitions for the moderation surface.
//!
//! Every endpoint here requires moderator capability.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::moderation;
use crate::state::AppState;

/// Routes mounted at `/moderation`.
///
/// ```text
/// GET    /queue                       -> queue (?status=, ?kind=)
/// POST   /listings/{id}/approve       -> approve
/// POST   /listings/{id}/reject        -> reject (body: {reason})
/// POST   /listings/{id}/restore       -> restore
/// POST   /listings/{id}/archive       -> archive
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/queue", get(moderation::queue))
        .route("/listings/{id}/approve", post(moderation::approve))
        .route("/listings/{id}/reject", post(moderation::reject))
        .route("/listings/{id}/restore", post(moderation::restore))
        .route("/listings/{id}/archive", post(moderation::archive))
}
