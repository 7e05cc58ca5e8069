//! Access-token validation.
//!
//! Account registration, login, and token issuance belong to the external
//! identity provider; this module only verifies its HS256 tokens and
//! extracts the caller id. The caller's role is never read from the token —
//! it is looked up from the `users` table per request (see
//! `middleware::auth`).

pub mod jwt;
