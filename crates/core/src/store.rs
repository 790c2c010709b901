//! Persistence port for identity records.
//!
//! One trait covers users, roles, and assignments; the Postgres adapter in
//! `gatehouse-db` is the production implementation. Inserts and updates return
//! the row as re-read from storage, not the value that was passed in.

use async_trait::async_trait;

use crate::identity::{ProfileUpdate, Role, User, UserRole};
use crate::types::Timestamp;

/// Errors reported by an [`IdentityStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Zero rows matched a read, update, or delete.
    #[error("no matching row")]
    NotFound,

    /// A unique or primary-key constraint rejected the write.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A foreign-key constraint rejected the write or delete.
    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// Transport, driver, or any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD and composite reads over users, roles, and user-role assignments.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> StoreResult<User>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn find_user_by_id(&self, user_id: &str) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<User>;
    /// Users holding the role with the given name.
    async fn list_users_with_role(&self, role_name: &str) -> StoreResult<Vec<User>>;
    async fn update_user_profile(
        &self,
        user_id: &str,
        profile: &ProfileUpdate,
        updated_at: Timestamp,
    ) -> StoreResult<User>;
    async fn update_user_password(
        &self,
        user_id: &str,
        password_hash: &str,
        updated_at: Timestamp,
    ) -> StoreResult<User>;
    async fn delete_user(&self, user_id: &str) -> StoreResult<()>;

    async fn insert_role(&self, role: &Role) -> StoreResult<Role>;
    async fn list_roles(&self) -> StoreResult<Vec<Role>>;
    async fn find_role_by_id(&self, role_id: &str) -> StoreResult<Role>;
    /// The role with exactly this name and description.
    async fn find_role_by_content(&self, name: &str, description: &str) -> StoreResult<Role>;
    async fn update_role(&self, role: &Role) -> StoreResult<Role>;
    async fn delete_role(&self, role_id: &str) -> StoreResult<()>;

    async fn insert_user_role(&self, user_role: &UserRole) -> StoreResult<UserRole>;
    async fn delete_user_role(&self, user_role: &UserRole) -> StoreResult<()>;
    async fn list_roles_for_user(&self, user_id: &str) -> StoreResult<Vec<Role>>;
}
