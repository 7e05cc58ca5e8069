//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod conversation_repo;
pub mod listing_repo;
pub mod message_repo;
pub mod user_repo;

pub use conversation_repo::ConversationRepo;
pub use listing_repo::ListingRepo;
pub use message_repo::MessageRepo;
pub use user_repo::UserRepo;
