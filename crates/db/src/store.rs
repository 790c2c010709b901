//! [`IdentityStore`] backed by Postgres.

use async_trait::async_trait;
use gatehouse_core::identity::{ProfileUpdate, Role, User, UserRole};
use gatehouse_core::store::{IdentityStore, StoreError, StoreResult};
use gatehouse_core::types::Timestamp;
use sqlx::PgPool;

use crate::repositories::{RoleRepo, UserRepo, UserRoleRepo};
use crate::schema::TableNames;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Postgres implementation of the identity store over one [`TableNames`] set.
#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
    tables: TableNames,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool, tables: TableNames) -> Self {
        Self { pool, tables }
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }
}

/// Translate a driver error into the port's error vocabulary.
fn classify(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => StoreError::UniqueViolation { constraint },
                Some(FOREIGN_KEY_VIOLATION) => StoreError::ForeignKeyViolation { constraint },
                _ => StoreError::Backend(db_err.to_string()),
            }
        }
        other => StoreError::Backend(other.to_string()),
    }
}

fn found<T, R: Into<T>>(row: Option<R>) -> StoreResult<T> {
    row.map(Into::into).ok_or(StoreError::NotFound)
}

fn removed(deleted: bool) -> StoreResult<()> {
    if deleted {
        Ok(())
    } else {
        Err(StoreError::NotFound)
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn insert_user(&self, user: &User) -> StoreResult<User> {
        UserRepo::create(&self.pool, &self.tables, user)
            .await
            .map(Into::into)
            .map_err(classify)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = UserRepo::list(&self.pool, &self.tables)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_user_by_id(&self, user_id: &str) -> StoreResult<User> {
        found(
            UserRepo::find_by_id(&self.pool, &self.tables, user_id)
                .await
                .map_err(classify)?,
        )
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<User> {
        found(
            UserRepo::find_by_email(&self.pool, &self.tables, email)
                .await
                .map_err(classify)?,
        )
    }

    async fn list_users_with_role(&self, role_name: &str) -> StoreResult<Vec<User>> {
        let rows = UserRepo::list_with_role(&self.pool, &self.tables, role_name)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_user_profile(
        &self,
        user_id: &str,
        profile: &ProfileUpdate,
        updated_at: Timestamp,
    ) -> StoreResult<User> {
        found(
            UserRepo::update_profile(&self.pool, &self.tables, user_id, profile, updated_at)
                .await
                .map_err(classify)?,
        )
    }

    async fn update_user_password(
        &self,
        user_id: &str,
        password_hash: &str,
        updated_at: Timestamp,
    ) -> StoreResult<User> {
        found(
            UserRepo::update_password(&self.pool, &self.tables, user_id, password_hash, updated_at)
                .await
                .map_err(classify)?,
        )
    }

    async fn delete_user(&self, user_id: &str) -> StoreResult<()> {
        removed(
            UserRepo::delete(&self.pool, &self.tables, user_id)
                .await
                .map_err(classify)?,
        )
    }

    async fn insert_role(&self, role: &Role) -> StoreResult<Role> {
        RoleRepo::create(&self.pool, &self.tables, role)
            .await
            .map(Into::into)
            .map_err(classify)
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        let rows = RoleRepo::list(&self.pool, &self.tables)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_role_by_id(&self, role_id: &str) -> StoreResult<Role> {
        found(
            RoleRepo::find_by_id(&self.pool, &self.tables, role_id)
                .await
                .map_err(classify)?,
        )
    }

    async fn find_role_by_content(&self, name: &str, description: &str) -> StoreResult<Role> {
        found(
            RoleRepo::find_by_content(&self.pool, &self.tables, name, description)
                .await
                .map_err(classify)?,
        )
    }

    async fn update_role(&self, role: &Role) -> StoreResult<Role> {
        found(
            RoleRepo::update(&self.pool, &self.tables, role)
                .await
                .map_err(classify)?,
        )
    }

    async fn delete_role(&self, role_id: &str) -> StoreResult<()> {
        removed(
            RoleRepo::delete(&self.pool, &self.tables, role_id)
                .await
                .map_err(classify)?,
        )
    }

    async fn insert_user_role(&self, user_role: &UserRole) -> StoreResult<UserRole> {
        UserRoleRepo::create(&self.pool, &self.tables, user_role)
            .await
            .map(Into::into)
            .map_err(classify)
    }

    async fn delete_user_role(&self, user_role: &UserRole) -> StoreResult<()> {
        removed(
            UserRoleRepo::delete(&self.pool, &self.tables, user_role)
                .await
                .map_err(classify)?,
        )
    }

    async fn list_roles_for_user(&self, user_id: &str) -> StoreResult<Vec<Role>> {
        let rows = UserRoleRepo::list_roles_for_user(&self.pool, &self.tables, user_id)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
