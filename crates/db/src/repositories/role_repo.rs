//! Repository for the roles table.

use gatehouse_core::identity::Role;
use sqlx::PgPool;

use crate::models::role::RoleRow;
use crate::schema::TableNames;

const COLUMNS: &str = "role_id, name, description";

/// Provides CRUD operations for roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Insert a role, returning the created row.
    pub async fn create(
        pool: &PgPool,
        tables: &TableNames,
        role: &Role,
    ) -> Result<RoleRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO {roles} (role_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}",
            roles = tables.roles()
        );
        sqlx::query_as::<_, RoleRow>(&query)
            .bind(&role.role_id)
            .bind(&role.name)
            .bind(&role.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tables: &TableNames,
        role_id: &str,
    ) -> Result<Option<RoleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {roles} WHERE role_id = $1",
            roles = tables.roles()
        );
        sqlx::query_as::<_, RoleRow>(&query)
            .bind(role_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the role with exactly this name and description.
    pub async fn find_by_content(
        pool: &PgPool,
        tables: &TableNames,
        name: &str,
        description: &str,
    ) -> Result<Option<RoleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {roles} WHERE name = $1 AND description = $2",
            roles = tables.roles()
        );
        sqlx::query_as::<_, RoleRow>(&query)
            .bind(name)
            .bind(description)
            .fetch_optional(pool)
            .await
    }

    /// List all roles ordered by name, then description.
    pub async fn list(pool: &PgPool, tables: &TableNames) -> Result<Vec<RoleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {roles} ORDER BY name ASC, description ASC",
            roles = tables.roles()
        );
        sqlx::query_as::<_, RoleRow>(&query).fetch_all(pool).await
    }

    /// Replace a role's name and description.
    ///
    /// Returns `None` if no row with the given id exists.
    pub async fn update(
        pool: &PgPool,
        tables: &TableNames,
        role: &Role,
    ) -> Result<Option<RoleRow>, sqlx::Error> {
        let query = format!(
            "UPDATE {roles} SET name = $2, description = $3
             WHERE role_id = $1
             RETURNING {COLUMNS}",
            roles = tables.roles()
        );
        sqlx::query_as::<_, RoleRow>(&query)
            .bind(&role.role_id)
            .bind(&role.name)
            .bind(&role.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a role. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while the role is assigned.
    pub async fn delete(
        pool: &PgPool,
        tables: &TableNames,
        role_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {roles} WHERE role_id = $1", roles = tables.roles());
        let result = sqlx::query(&query).bind(role_id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
