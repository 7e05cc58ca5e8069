use std::sync::Arc;

use annunci_events::{ConversationBus, EmailDelivery};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: annunci_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Per-conversation push bus feeding the WebSocket endpoint.
    pub bus: Arc<ConversationBus>,
    /// Outbound email bridge; `None` when SMTP is not configured.
    pub email: Option<Arc<EmailDelivery>>,
}
