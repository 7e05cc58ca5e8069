//! Listing entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use annunci_core::listing::{ListingAttributes, ListingStatus};
use annunci_core::types::{DbId, Timestamp};
use annunci_core::CoreError;

/// A row from the `listings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub owner_id: DbId,
    /// `property` or `product`.
    pub kind: String,
    /// `pending`, `approved`, `rejected`, or `archived`.
    pub status: String,
    pub title: String,
    pub description: String,
    /// Kind-tagged attribute payload (see `ListingAttributes`).
    pub attributes: serde_json::Value,
    /// Present iff `status = 'rejected'`.
    pub rejected_reason: Option<String>,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    /// Set on first approval, never cleared.
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Listing {
    /// Parse the status column into the state-machine enum.
    pub fn status(&self) -> Result<ListingStatus, CoreError> {
        ListingStatus::parse(&self.status)
    }
}

/// A row from the `listing_images` table. Position 0 is the cover image.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListingImage {
    pub id: DbId,
    pub listing_id: DbId,
    pub position: i32,
    pub storage_ref: String,
    pub created_at: Timestamp,
}

/// DTO for creating a listing. The kind is carried by the attribute
/// payload's tag, so it cannot disagree with the stored row.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateListing {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 8000))]
    #[serde(default)]
    pub description: String,
    pub attributes: ListingAttributes,
    /// Durable image references, in display order.
    #[serde(default)]
    pub images: Vec<String>,
}

/// DTO for an owner edit. Content and image set are replaced as a unit;
/// the listing always drops back to `pending` for re-review.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditListing {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 8000))]
    #[serde(default)]
    pub description: String,
    pub attributes: ListingAttributes,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A listing together with its ordered image set.
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetail {
    #[serde(flatten)]
    pub listing: Listing,
    pub images: Vec<ListingImage>,
}
