//! Route definitions for the `/listings` resource.
//!
//! Browsing and single-listing reads work anonymously; everything else
//! requires authentication (enforced by extractors in the handlers).

use axum::routing::get;
use axum::Router;

use crate::handlers::listing;
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET    /           -> list_public (approved only, ?kind=)
/// POST   /           -> create
/// GET    /mine       -> list_mine
/// GET    /{id}       -> get_by_id
/// PUT    /{id}       -> update (owner, resets to pending)
/// DELETE /{id}       -> delete (owner or moderator)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(listing::list_public).post(listing::create))
        .route("/mine", get(listing::list_mine))
        .route(
            "/{id}",
            get(listing::get_by_id)
                .put(listing::update)
                .delete(listing::delete),
        )
}
