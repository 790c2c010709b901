//! Identity records (users, roles, assignments) and their input DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{EntityId, Timestamp};

/// A persisted user account.
///
/// Holds the password hash -- never serialize this to an external response.
/// Use [`UserResponse`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: EntityId,
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

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user_id: EntityId,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub phone_number: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            fullname: user.fullname,
            phone_number: user.phone_number,
            avatar: user.avatar,
            address: user.address,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input for account creation. `password` is plaintext and is hashed before
/// it reaches storage.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 255, message = "username must not be empty"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "fullname must not be empty"))]
    pub fullname: String,
    pub phone_number: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<String>,
}

/// Replacement profile fields for an existing user. The password is changed
/// through a separate operation and is never touched here.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 255, message = "username must not be empty"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "fullname must not be empty"))]
    pub fullname: String,
    pub phone_number: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<String>,
}

/// A named permission bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role_id: EntityId,
    pub name: String,
    /// Empty when no description was given.
    #[serde(default)]
    pub description: String,
}

impl Role {
    /// Whether this role has exactly the given content.
    pub fn matches(&self, name: &str, description: &str) -> bool {
        self.name == name && self.description == description
    }
}

/// Input for role creation and replacement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRole {
    #[validate(length(min = 1, max = 255, message = "role name must not be empty"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub description: String,
}

/// Assignment of one role to one user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRole {
    pub user_id: EntityId,
    pub role_id: EntityId,
}
