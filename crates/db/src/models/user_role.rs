//! Assignment row model.

use gatehouse_core::identity::UserRole;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct UserRoleRow {
    pub user_id: String,
    pub role_id: String,
}

impl From<UserRoleRow> for UserRole {
    fn from(row: UserRoleRow) -> Self {
        Self {
            user_id: row.user_id,
            role_id: row.role_id,
        }
    }
}
