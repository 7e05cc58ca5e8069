//! Outbound delivery channels.
//!
//! Email is the only outbound channel: moderation verdicts notify the
//! listing owner. Delivery is best-effort — a failure is logged and never
//! blocks the action that triggered it.

pub mod email;
