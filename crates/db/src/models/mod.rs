//! Row structs for the identity tables.
//!
//! Each row converts into its `gatehouse_core` counterpart; nothing outside
//! this crate sees a row type.

pub mod role;
pub mod user;
pub mod user_role;
