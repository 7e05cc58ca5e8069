//! Per-conversation WebSocket delivery.
//!
//! Each connection subscribes to exactly one conversation's broadcast
//! channel and forwards stored messages as JSON frames. The socket is a
//! delivery optimization only; the HTTP history endpoint remains the
//! source of truth.

mod handler;

pub use handler::conversation_ws;
