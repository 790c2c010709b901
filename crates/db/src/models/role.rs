//! Role row model.

use gatehouse_core::identity::Role;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub role_id: String,
    pub name: String,
    pub description: String,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Self {
            role_id: row.role_id,
            name: row.name,
            description: row.description,
        }
    }
}
