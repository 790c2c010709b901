//! User row model.

use gatehouse_core::identity::User;
use gatehouse_core::types::Timestamp;
use sqlx::FromRow;

/// Full row from the users table, password hash included.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub fullname: String,
    pub phone_number: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            username: row.username,
            password_hash: row.password_hash,
            email: row.email,
            fullname: row.fullname,
            phone_number: row.phone_number,
            avatar: row.avatar,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
