//! Identity and access-control core.
//!
//! - [`credentials`] -- Argon2id password hashing and verification.
//! - [`token`] -- signed, time-bounded identity tokens.
//! - [`identity`] -- user, role, and assignment records plus their input DTOs.
//! - [`store`] -- the [`store::IdentityStore`] port implemented by storage adapters.
//! - [`service`] -- [`service::AccessService`], which orchestrates the above.

pub mod credentials;
pub mod error;
pub mod identity;
pub mod service;
pub mod store;
pub mod token;
pub mod types;
