//! Best-effort email notifications for moderation outcomes.
//!
//! Delivery runs on a detached task so it never holds up the API response.
//! A missing SMTP configuration or a transport failure is logged and
//! otherwise ignored; the transition itself has already committed.

use annunci_db::models::listing::Listing;
use annunci_db::repositories::UserRepo;

use crate::state::AppState;

/// Notify the listing owner that a moderation decision landed. Only
/// approvals and rejections produce mail; other transitions are silent.
pub fn notify_moderation_outcome(state: &AppState, listing: &Listing) {
    let Some(email) = state.email.clone() else {
        tracing::debug!(listing_id = listing.id, "Email delivery not configured, skipping notification");
        return;
    };

    let pool = state.pool.clone();
    let listing = listing.clone();

    tokio::spawn(async move {
        let owner = match UserRepo::find_by_id(&pool, listing.owner_id).await {
            Ok(Some(owner)) => owner,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(listing_id = listing.id, error = %e, "Owner lookup failed, notification dropped");
                return;
            }
        };

        let (subject, body) = match listing.status.as_str() {
            "approved" => (
                format!("Your listing \"{}\" is now published", listing.title),
                format!(
                    "Hi {},\n\nYour listing \"{}\" passed review and is now visible to everyone.\n",
                    owner.display_name, listing.title
                ),
            ),
            "rejected" => {
                let reason = listing.rejected_reason.as_deref().unwrap_or("No reason recorded");
                (
                    format!("Your listing \"{}\" was not approved", listing.title),
                    format!(
                        "Hi {},\n\nYour listing \"{}\" was rejected by our moderators.\n\nReason: {}\n\nYou can edit the listing and resubmit it for review.\n",
                        owner.display_name, listing.title, reason
                    ),
                )
            }
            _ => return,
        };

        if let Err(e) = email.send(&owner.email, &subject, &body).await {
            tracing::warn!(listing_id = listing.id, error = %e, "Moderation notification email failed");
        }
    });
}
