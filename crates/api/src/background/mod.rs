//! Background jobs spawned at startup and stopped via cancellation token.

pub mod retention;
