//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs (with `validator` derives where the field
//!   constraints are structural)

pub mod conversation;
pub mod listing;
pub mod message;
pub mod user;
