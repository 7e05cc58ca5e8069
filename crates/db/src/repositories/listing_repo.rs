//! Repository for the `listings` and `listing_images` tables.
//!
//! Every moderation transition is a single guarded UPDATE: the `WHERE
//! status IN (...)` clause re-checks the precondition at commit time, so a
//! concurrent transition that already moved the listing makes the statement
//! return no row instead of silently overwriting the newer state. Status
//! and its accompanying metadata always commit together.

use sqlx::{PgPool, Postgres, Transaction};

use annunci_core::types::DbId;

use crate::models::listing::{CreateListing, EditListing, Listing, ListingDetail, ListingImage};

/// Column list for listings queries.
const COLUMNS: &str = "id, owner_id, kind, status, title, description, attributes, \
    rejected_reason, approved_by, approved_at, published_at, created_at, updated_at";

/// Column list for listing_images queries.
const IMAGE_COLUMNS: &str = "id, listing_id, position, storage_ref, created_at";

/// Provides CRUD and moderation-transition operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new listing in `pending` status together with its image
    /// set, in one transaction.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateListing,
    ) -> Result<ListingDetail, sqlx::Error> {
        let kind = input.attributes.kind().as_str();
        let attributes = encode_attributes(&input.attributes)?;

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO listings (owner_id, kind, title, description, attributes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let listing = sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .bind(kind)
            .bind(&input.title)
            .bind(&input.description)
            .bind(attributes)
            .fetch_one(&mut *tx)
            .await?;

        let images = insert_images(&mut tx, listing.id, &input.images).await?;

        tx.commit().await?;
        tracing::debug!(
            listing_id = listing.id,
            kind = %listing.kind,
            image_count = images.len(),
            "Listing row created"
        );
        Ok(ListingDetail { listing, images })
    }

    /// Find a listing by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The ordered image set for a listing.
    pub async fn images_for(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Vec<ListingImage>, sqlx::Error> {
        let query = format!(
            "SELECT {IMAGE_COLUMNS} FROM listing_images
             WHERE listing_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, ListingImage>(&query)
            .bind(listing_id)
            .fetch_all(pool)
            .await
    }

    /// List a user's own listings, newest first, in any status.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE owner_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List listings by status with an optional kind filter.
    ///
    /// Backs both the moderation queues (`pending` oldest-first is the
    /// review order) and the public approved browse.
    pub async fn list_by_status(
        pool: &PgPool,
        status: &str,
        kind: Option<&str>,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE status = $1 AND ($2::text IS NULL OR kind = $2)
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(status)
            .bind(kind)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Moderation transitions
    // -----------------------------------------------------------------------

    /// Approve a listing. `published_at` is set only on first approval.
    ///
    /// Returns `None` if the listing does not exist or is no longer in a
    /// state that permits approval.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        moderator_id: DbId,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET
                status = 'approved',
                approved_by = $2,
                approved_at = now(),
                published_at = COALESCE(published_at, now()),
                rejected_reason = NULL,
                updated_at = now()
             WHERE id = $1 AND status IN ('pending', 'rejected', 'archived')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(moderator_id)
            .fetch_optional(pool)
            .await
    }

    /// Reject a listing with a reason. `published_at` is untouched; the
    /// deciding moderator and time are recorded.
    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        moderator_id: DbId,
        reason: &str,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET
                status = 'rejected',
                rejected_reason = $3,
                approved_by = $2,
                approved_at = now(),
                updated_at = now()
             WHERE id = $1 AND status <> 'rejected'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(moderator_id)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// Restore a rejected or archived listing to `pending`, clearing the
    /// review verdict so a fresh decision is forced.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET
                status = 'pending',
                rejected_reason = NULL,
                approved_by = NULL,
                approved_at = NULL,
                updated_at = now()
             WHERE id = $1 AND status IN ('rejected', 'archived')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Archive a listing. No other field changes.
    pub async fn archive(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET
                status = 'archived',
                updated_at = now()
             WHERE id = $1 AND status <> 'archived'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply an owner edit: replace content and image set as a unit, force
    /// status back to `pending`, and clear the review verdict. Only
    /// `published_at` survives.
    ///
    /// Returns `None` if the listing does not exist or is archived (the
    /// status guard re-checks edit eligibility at commit time).
    pub async fn owner_edit(
        pool: &PgPool,
        id: DbId,
        input: &EditListing,
    ) -> Result<Option<ListingDetail>, sqlx::Error> {
        let kind = input.attributes.kind().as_str();
        let attributes = encode_attributes(&input.attributes)?;

        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE listings SET
                kind = $2,
                title = $3,
                description = $4,
                attributes = $5,
                status = 'pending',
                rejected_reason = NULL,
                approved_by = NULL,
                approved_at = NULL,
                updated_at = now()
             WHERE id = $1 AND status IN ('pending', 'approved', 'rejected')
             RETURNING {COLUMNS}"
        );
        let listing = sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(kind)
            .bind(&input.title)
            .bind(&input.description)
            .bind(attributes)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(listing) = listing else {
            tx.rollback().await?;
            tracing::debug!(listing_id = id, "Owner edit skipped, status guard failed");
            return Ok(None);
        };

        sqlx::query("DELETE FROM listing_images WHERE listing_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let images = insert_images(&mut tx, id, &input.images).await?;

        tx.commit().await?;
        Ok(Some(ListingDetail { listing, images }))
    }

    /// Hard-delete a listing. Unconditional; cascades to images,
    /// conversations, and messages. Returns `false` if no row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Serialize the kind-tagged attribute payload for a JSONB bind.
fn encode_attributes(
    attributes: &annunci_core::listing::ListingAttributes,
) -> Result<serde_json::Value, sqlx::Error> {
    serde_json::to_value(attributes).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

/// Insert an ordered image set for a listing inside an open transaction.
async fn insert_images(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: DbId,
    refs: &[String],
) -> Result<Vec<ListingImage>, sqlx::Error> {
    let query = format!(
        "INSERT INTO listing_images (listing_id, position, storage_ref)
         VALUES ($1, $2, $3)
         RETURNING {IMAGE_COLUMNS}"
    );

    let mut images = Vec::with_capacity(refs.len());
    for (position, storage_ref) in refs.iter().enumerate() {
        let image = sqlx::query_as::<_, ListingImage>(&query)
            .bind(listing_id)
            .bind(position as i32)
            .bind(storage_ref)
            .fetch_one(&mut **tx)
            .await?;
        images.push(image);
    }
    Ok(images)
}
