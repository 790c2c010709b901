//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` and the active [`TableNames`](crate::TableNames) as their
//! first two arguments.

pub mod role_repo;
pub mod user_repo;
pub mod user_role_repo;

pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
pub use user_role_repo::UserRoleRepo;
