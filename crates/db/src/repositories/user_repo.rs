//! Repository for the users table.

use gatehouse_core::identity::{ProfileUpdate, User};
use gatehouse_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::user::UserRow;
use crate::schema::TableNames;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "user_id, username, password_hash, email, fullname, phone_number, \
                       avatar, address, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(
        pool: &PgPool,
        tables: &TableNames,
        user: &User,
    ) -> Result<UserRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO {users} (user_id, username, password_hash, email, fullname,
                                  phone_number, avatar, address, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}",
            users = tables.users()
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(&user.user_id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.email)
            .bind(&user.fullname)
            .bind(&user.phone_number)
            .bind(&user.avatar)
            .bind(&user.address)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tables: &TableNames,
        user_id: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {users} WHERE user_id = $1",
            users = tables.users()
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(
        pool: &PgPool,
        tables: &TableNames,
        email: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {users} WHERE email = $1",
            users = tables.users()
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all users, oldest first.
    pub async fn list(pool: &PgPool, tables: &TableNames) -> Result<Vec<UserRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {users} ORDER BY created_at ASC, user_id ASC",
            users = tables.users()
        );
        sqlx::query_as::<_, UserRow>(&query).fetch_all(pool).await
    }

    /// List users holding at least one role named `role_name`.
    pub async fn list_with_role(
        pool: &PgPool,
        tables: &TableNames,
        role_name: &str,
    ) -> Result<Vec<UserRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {users}
             WHERE user_id IN (
                 SELECT ur.user_id
                 FROM {user_roles} ur
                 JOIN {roles} r ON r.role_id = ur.role_id
                 WHERE r.name = $1
             )
             ORDER BY created_at ASC, user_id ASC",
            users = tables.users(),
            roles = tables.roles(),
            user_roles = tables.user_roles(),
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(role_name)
            .fetch_all(pool)
            .await
    }

    /// Replace the profile fields of a user. The password hash is untouched.
    ///
    /// Returns `None` if no row with the given id exists.
    pub async fn update_profile(
        pool: &PgPool,
        tables: &TableNames,
        user_id: &str,
        profile: &ProfileUpdate,
        updated_at: Timestamp,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!(
            "UPDATE {users} SET
                username = $2,
                email = $3,
                fullname = $4,
                phone_number = $5,
                avatar = $6,
                address = $7,
                updated_at = $8
             WHERE user_id = $1
             RETURNING {COLUMNS}",
            users = tables.users()
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(user_id)
            .bind(&profile.username)
            .bind(&profile.email)
            .bind(&profile.fullname)
            .bind(&profile.phone_number)
            .bind(&profile.avatar)
            .bind(&profile.address)
            .bind(updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Store a new password hash.
    ///
    /// Returns `None` if no row with the given id exists.
    pub async fn update_password(
        pool: &PgPool,
        tables: &TableNames,
        user_id: &str,
        password_hash: &str,
        updated_at: Timestamp,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!(
            "UPDATE {users} SET password_hash = $2, updated_at = $3
             WHERE user_id = $1
             RETURNING {COLUMNS}",
            users = tables.users()
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(user_id)
            .bind(password_hash)
            .bind(updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a user. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        tables: &TableNames,
        user_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {users} WHERE user_id = $1", users = tables.users());
        let result = sqlx::query(&query).bind(user_id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
