//! Event infrastructure for the annunci marketplace.
//!
//! - [`ConversationBus`] — per-conversation publish/subscribe hub backed by
//!   `tokio::sync::broadcast`, carrying new-message pushes to live viewers.
//! - [`delivery`] — outbound email bridge (SMTP via lettre), best-effort.

pub mod bus;
pub mod delivery;

pub use bus::{ConversationBus, MessagePush};
pub use delivery::email::{EmailConfig, EmailDelivery};
