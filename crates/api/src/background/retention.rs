//! Periodic purge of expired messages.
//!
//! Messages carry an `expires_at` set at send time; read paths already
//! filter on it, so this sweeper only reclaims storage. Runs on a fixed
//! interval until cancelled.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use annunci_db::repositories::MessageRepo;

/// How often the sweeper runs, overridable via `MESSAGE_SWEEP_INTERVAL_SECS`.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Run the message retention sweep loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("MESSAGE_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

    tracing::info!(interval_secs, "Message retention sweeper started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Message retention sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                match MessageRepo::purge_expired(&pool).await {
                    Ok(purged) => {
                        if purged > 0 {
                            tracing::info!(purged, "Message retention: purged expired messages");
                        } else {
                            tracing::debug!("Message retention: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Message retention: purge failed");
                    }
                }
            }
        }
    }
}
