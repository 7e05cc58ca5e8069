//! Listing kinds, statuses, and kind-specific content validation.
//!
//! A listing is either a real-estate property or a handmade product. Both
//! share one lifecycle (see [`crate::moderation`]); what differs is the
//! kind-specific attribute payload, modelled as the internally tagged
//! [`ListingAttributes`] enum so a property row can never carry product
//! fields and vice versa.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum listing title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum listing description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 8000;

/// Maximum number of images attached to one listing.
pub const MAX_IMAGES: usize = 12;

// ---------------------------------------------------------------------------
// ListingKind
// ---------------------------------------------------------------------------

/// The two concrete listing kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Property,
    Product,
}

impl ListingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingKind::Property => "property",
            ListingKind::Product => "product",
        }
    }

    /// Parse a kind from its database representation.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "property" => Ok(ListingKind::Property),
            "product" => Ok(ListingKind::Product),
            other => Err(CoreError::Validation(format!(
                "Invalid listing kind '{other}'. Must be 'property' or 'product'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ListingStatus
// ---------------------------------------------------------------------------

/// Moderation status of a listing. Exactly one value at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// Awaiting moderator review. Initial state.
    Pending,
    /// Approved by a moderator and visible to browsers.
    Approved,
    /// Rejected by a moderator; carries a non-empty reason.
    Rejected,
    /// Taken off the site without a review verdict.
    Archived,
}

/// All valid status values, matching the `listings.status` CHECK constraint.
pub const VALID_STATUSES: &[&str] = &["pending", "approved", "rejected", "archived"];

impl ListingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Approved => "approved",
            ListingStatus::Rejected => "rejected",
            ListingStatus::Archived => "archived",
        }
    }

    /// Parse a status from its database representation.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(ListingStatus::Pending),
            "approved" => Ok(ListingStatus::Approved),
            "rejected" => Ok(ListingStatus::Rejected),
            "archived" => Ok(ListingStatus::Archived),
            other => Err(CoreError::Validation(format!(
                "Invalid listing status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ListingAttributes
// ---------------------------------------------------------------------------

/// Property contract types accepted by [`PropertyAttributes`].
pub const VALID_CONTRACTS: &[&str] = &["sale", "rent"];

/// Kind-specific fields for a real-estate listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAttributes {
    /// `"sale"` or `"rent"`.
    pub contract: String,
    pub city: String,
    pub rooms: Option<i32>,
    pub surface_sqm: Option<i32>,
    pub price_cents: Option<i64>,
}

/// Kind-specific fields for a handmade-goods listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAttributes {
    pub category: String,
    pub material: Option<String>,
    pub price_cents: Option<i64>,
}

/// Kind-tagged attribute payload, persisted as JSONB.
///
/// The `kind` tag doubles as the listing's kind column, so a stored payload
/// can never disagree with the row it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListingAttributes {
    Property(PropertyAttributes),
    Product(ProductAttributes),
}

impl ListingAttributes {
    /// The listing kind this payload belongs to.
    pub fn kind(&self) -> ListingKind {
        match self {
            ListingAttributes::Property(_) => ListingKind::Property,
            ListingAttributes::Product(_) => ListingKind::Product,
        }
    }

    /// Validate the kind-specific fields.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            ListingAttributes::Property(attrs) => {
                if !VALID_CONTRACTS.contains(&attrs.contract.as_str()) {
                    return Err(CoreError::Validation(format!(
                        "Invalid contract '{}'. Must be one of: {}",
                        attrs.contract,
                        VALID_CONTRACTS.join(", ")
                    )));
                }
                if attrs.city.trim().is_empty() {
                    return Err(CoreError::Validation("City must not be empty".into()));
                }
                if let Some(rooms) = attrs.rooms {
                    if rooms <= 0 {
                        return Err(CoreError::Validation("Rooms must be positive".into()));
                    }
                }
                if let Some(sqm) = attrs.surface_sqm {
                    if sqm <= 0 {
                        return Err(CoreError::Validation("Surface must be positive".into()));
                    }
                }
                validate_price(attrs.price_cents)
            }
            ListingAttributes::Product(attrs) => {
                if attrs.category.trim().is_empty() {
                    return Err(CoreError::Validation("Category must not be empty".into()));
                }
                validate_price(attrs.price_cents)
            }
        }
    }
}

fn validate_price(price_cents: Option<i64>) -> Result<(), CoreError> {
    match price_cents {
        Some(p) if p < 0 => Err(CoreError::Validation("Price must not be negative".into())),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Content validation
// ---------------------------------------------------------------------------

/// Validate title, description, and image count for a create or edit.
pub fn validate_content(
    title: &str,
    description: &str,
    image_count: usize,
) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    if image_count > MAX_IMAGES {
        return Err(CoreError::Validation(format!(
            "At most {MAX_IMAGES} images per listing"
        )));
    }
    Ok(())
}
