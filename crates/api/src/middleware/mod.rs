//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated caller from a bearer token.

pub mod auth;
