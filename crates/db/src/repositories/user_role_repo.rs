//! Repository for the user_roles join table.

use gatehouse_core::identity::UserRole;
use sqlx::PgPool;

use crate::models::role::RoleRow;
use crate::models::user_role::UserRoleRow;
use crate::schema::TableNames;

/// Provides assignment operations between users and roles.
pub struct UserRoleRepo;

impl UserRoleRepo {
    /// Insert an assignment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        tables: &TableNames,
        user_role: &UserRole,
    ) -> Result<UserRoleRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO {user_roles} (user_id, role_id)
             VALUES ($1, $2)
             RETURNING user_id, role_id",
            user_roles = tables.user_roles()
        );
        sqlx::query_as::<_, UserRoleRow>(&query)
            .bind(&user_role.user_id)
            .bind(&user_role.role_id)
            .fetch_one(pool)
            .await
    }

    /// Remove an assignment. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        tables: &TableNames,
        user_role: &UserRole,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "DELETE FROM {user_roles} WHERE user_id = $1 AND role_id = $2",
            user_roles = tables.user_roles()
        );
        let result = sqlx::query(&query)
            .bind(&user_role.user_id)
            .bind(&user_role.role_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the roles assigned to a user, ordered by name.
    pub async fn list_roles_for_user(
        pool: &PgPool,
        tables: &TableNames,
        user_id: &str,
    ) -> Result<Vec<RoleRow>, sqlx::Error> {
        let query = format!(
            "SELECT r.role_id, r.name, r.description
             FROM {roles} r
             JOIN {user_roles} ur ON ur.role_id = r.role_id
             WHERE ur.user_id = $1
             ORDER BY r.name ASC, r.description ASC",
            roles = tables.roles(),
            user_roles = tables.user_roles(),
        );
        sqlx::query_as::<_, RoleRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
