//! Access service: account lifecycle, login, role management, and role
//! assignment on top of an [`IdentityStore`].
//!
//! Uniqueness pre-checks here (email on signup, content on role creation) only
//! produce friendlier outcomes. The store's own constraints are authoritative,
//! and a constraint hit on insert is translated into the same outcome the
//! pre-check would have produced.

use std::sync::Arc;

use chrono::Utc;
use validator::{Validate, ValidationErrors};

use crate::credentials::{
    hash_password, validate_password_strength, verify_dummy, verify_password,
    MIN_PASSWORD_LENGTH,
};
use crate::error::CoreError;
use crate::identity::{NewRole, NewUser, ProfileUpdate, Role, User, UserRole};
use crate::store::{IdentityStore, StoreError};
use crate::token::{Claims, TokenIssuer};
use crate::types::new_entity_id;

pub type CoreResult<T> = Result<T, CoreError>;

/// Orchestrates the credential codec, the token issuer, and the identity store.
///
/// Holds no mutable state; cheap to share behind an `Arc`.
pub struct AccessService {
    store: Arc<dyn IdentityStore>,
    tokens: TokenIssuer,
}

impl AccessService {
    pub fn new(store: Arc<dyn IdentityStore>, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Create an account. The returned user is the row as persisted, with the
    /// password hash included.
    pub async fn create_user(&self, input: NewUser) -> CoreResult<User> {
        input.validate().map_err(invalid)?;
        validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
            .map_err(CoreError::Validation)?;

        match self.store.find_user_by_email(&input.email).await {
            Ok(_) => return Err(CoreError::DuplicateEmail(input.email)),
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(classify(e, "User", &input.email)),
        }

        let password_hash = hash_password(&input.password)?;
        let now = Utc::now();
        let user = User {
            user_id: new_entity_id(),
            username: input.username,
            password_hash,
            email: input.email,
            fullname: input.fullname,
            phone_number: input.phone_number,
            avatar: input.avatar,
            address: input.address,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .store
            .insert_user(&user)
            .await
            .map_err(|e| classify_user_write(e, &user.user_id, &user.email))?;
        tracing::info!(user_id = %created.user_id, "User created");
        Ok(created)
    }

    pub async fn get_users(&self) -> CoreResult<Vec<User>> {
        self.store
            .list_users()
            .await
            .map_err(|e| classify(e, "User", ""))
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> CoreResult<User> {
        self.store
            .find_user_by_id(user_id)
            .await
            .map_err(|e| classify(e, "User", user_id))
    }

    pub async fn get_user_by_email(&self, email: &str) -> CoreResult<User> {
        self.store
            .find_user_by_email(email)
            .await
            .map_err(|e| classify(e, "User", email))
    }

    pub async fn get_users_with_role(&self, role_name: &str) -> CoreResult<Vec<User>> {
        self.store
            .list_users_with_role(role_name)
            .await
            .map_err(|e| classify(e, "Role", role_name))
    }

    /// Replace a user's profile fields and refresh `updated_at`. The password
    /// hash is left untouched.
    pub async fn update_profile(&self, user_id: &str, profile: ProfileUpdate) -> CoreResult<User> {
        profile.validate().map_err(invalid)?;

        let updated = self
            .store
            .update_user_profile(user_id, &profile, Utc::now())
            .await
            .map_err(|e| classify_user_write(e, user_id, &profile.email))?;
        tracing::info!(user_id = %updated.user_id, "User profile updated");
        Ok(updated)
    }

    /// Re-hash a fresh plaintext password and store it.
    pub async fn change_password(&self, user_id: &str, new_password: &str) -> CoreResult<User> {
        validate_password_strength(new_password, MIN_PASSWORD_LENGTH)
            .map_err(CoreError::Validation)?;
        let password_hash = hash_password(new_password)?;

        let updated = self
            .store
            .update_user_password(user_id, &password_hash, Utc::now())
            .await
            .map_err(|e| classify(e, "User", user_id))?;
        tracing::info!(user_id = %updated.user_id, "User password changed");
        Ok(updated)
    }

    /// Hard-delete a user. The user's role assignments go with it.
    pub async fn delete_user(&self, user_id: &str) -> CoreResult<()> {
        self.store
            .delete_user(user_id)
            .await
            .map_err(|e| classify(e, "User", user_id))?;
        tracing::info!(user_id, "User deleted");
        Ok(())
    }

    /// Check credentials and issue a token.
    ///
    /// An unknown email and a wrong password both yield
    /// [`CoreError::AuthenticationFailed`].
    pub async fn login(&self, email: &str, password: &str) -> CoreResult<String> {
        let user = match self.store.find_user_by_email(email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                verify_dummy(password);
                tracing::warn!("Login rejected: unknown account");
                return Err(CoreError::AuthenticationFailed);
            }
            Err(e) => return Err(classify(e, "User", email)),
        };

        if !verify_password(&user.password_hash, password)? {
            tracing::warn!(user_id = %user.user_id, "Login rejected: password mismatch");
            return Err(CoreError::AuthenticationFailed);
        }

        let token = self.tokens.issue(&user.user_id, &user.email)?;
        tracing::info!(user_id = %user.user_id, "Login succeeded");
        Ok(token)
    }

    /// Verify a bearer token and return its claims.
    pub fn authenticate(&self, token: &str) -> CoreResult<Claims> {
        Ok(self.tokens.verify(token)?)
    }

    // -----------------------------------------------------------------------
    // Roles
    // -----------------------------------------------------------------------

    /// Create a role, or return the existing role with identical name and
    /// description.
    pub async fn create_role(&self, input: NewRole) -> CoreResult<Role> {
        input.validate().map_err(invalid)?;

        let roles = self
            .store
            .list_roles()
            .await
            .map_err(|e| classify(e, "Role", ""))?;
        if let Some(existing) = roles
            .into_iter()
            .find(|r| r.matches(&input.name, &input.description))
        {
            tracing::debug!(role_id = %existing.role_id, "Role already exists, reusing");
            return Ok(existing);
        }

        let role = Role {
            role_id: new_entity_id(),
            name: input.name,
            description: input.description,
        };
        match self.store.insert_role(&role).await {
            Ok(created) => {
                tracing::info!(role_id = %created.role_id, name = %created.name, "Role created");
                Ok(created)
            }
            // Lost a race with an identical create; hand back the winner.
            Err(StoreError::UniqueViolation { .. }) => self
                .store
                .find_role_by_content(&role.name, &role.description)
                .await
                .map_err(|e| classify(e, "Role", &role.name)),
            Err(e) => Err(classify(e, "Role", &role.role_id)),
        }
    }

    pub async fn get_role_by_id(&self, role_id: &str) -> CoreResult<Role> {
        self.store
            .find_role_by_id(role_id)
            .await
            .map_err(|e| classify(e, "Role", role_id))
    }

    pub async fn get_roles(&self) -> CoreResult<Vec<Role>> {
        self.store
            .list_roles()
            .await
            .map_err(|e| classify(e, "Role", ""))
    }

    pub async fn update_role(&self, role_id: &str, input: NewRole) -> CoreResult<Role> {
        input.validate().map_err(invalid)?;

        let role = Role {
            role_id: role_id.to_string(),
            name: input.name,
            description: input.description,
        };
        let updated = self
            .store
            .update_role(&role)
            .await
            .map_err(|e| classify(e, "Role", role_id))?;
        tracing::info!(role_id, "Role updated");
        Ok(updated)
    }

    /// Delete a role. Fails with [`CoreError::ConstraintViolation`] while any
    /// user still holds it.
    pub async fn delete_role(&self, role_id: &str) -> CoreResult<()> {
        match self.store.delete_role(role_id).await {
            Ok(()) => {
                tracing::info!(role_id, "Role deleted");
                Ok(())
            }
            Err(StoreError::ForeignKeyViolation { .. }) => Err(CoreError::ConstraintViolation(
                format!("Role {role_id} is still assigned to users"),
            )),
            Err(e) => Err(classify(e, "Role", role_id)),
        }
    }

    // -----------------------------------------------------------------------
    // Assignments
    // -----------------------------------------------------------------------

    pub async fn add_user_role(&self, user_role: UserRole) -> CoreResult<UserRole> {
        match self.store.insert_user_role(&user_role).await {
            Ok(created) => {
                tracing::info!(
                    user_id = %created.user_id,
                    role_id = %created.role_id,
                    "Role assigned"
                );
                Ok(created)
            }
            Err(StoreError::UniqueViolation { .. }) => Err(CoreError::ConstraintViolation(
                format!(
                    "User {} already holds role {}",
                    user_role.user_id, user_role.role_id
                ),
            )),
            Err(StoreError::ForeignKeyViolation { .. }) => Err(CoreError::ConstraintViolation(
                format!(
                    "User {} or role {} does not exist",
                    user_role.user_id, user_role.role_id
                ),
            )),
            Err(e) => Err(classify(e, "UserRole", &assignment_id(&user_role))),
        }
    }

    pub async fn remove_user_role(&self, user_role: UserRole) -> CoreResult<()> {
        self.store
            .delete_user_role(&user_role)
            .await
            .map_err(|e| classify(e, "UserRole", &assignment_id(&user_role)))?;
        tracing::info!(
            user_id = %user_role.user_id,
            role_id = %user_role.role_id,
            "Role revoked"
        );
        Ok(())
    }

    /// An existing user together with the roles assigned to them. The user
    /// row is read once.
    pub async fn get_user_with_roles(&self, user_id: &str) -> CoreResult<(User, Vec<Role>)> {
        let user = self.get_user_by_id(user_id).await?;
        let roles = self
            .store
            .list_roles_for_user(user_id)
            .await
            .map_err(|e| classify(e, "User", user_id))?;
        Ok((user, roles))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid(errors: ValidationErrors) -> CoreError {
    CoreError::Validation(errors.to_string())
}

fn assignment_id(user_role: &UserRole) -> String {
    format!("{}/{}", user_role.user_id, user_role.role_id)
}

/// Translate a store error for the given entity into the domain taxonomy.
fn classify(err: StoreError, entity: &'static str, id: &str) -> CoreError {
    match err {
        StoreError::NotFound => CoreError::NotFound {
            entity,
            id: id.to_string(),
        },
        StoreError::UniqueViolation { constraint } => {
            CoreError::ConstraintViolation(format!("{entity} violates {constraint}"))
        }
        StoreError::ForeignKeyViolation { constraint } => {
            CoreError::ConstraintViolation(format!("{entity} violates {constraint}"))
        }
        StoreError::Backend(msg) => CoreError::Storage(msg),
    }
}

/// Like [`classify`], but a unique hit on the email constraint becomes
/// [`CoreError::DuplicateEmail`].
fn classify_user_write(err: StoreError, user_id: &str, email: &str) -> CoreError {
    match err {
        StoreError::UniqueViolation { constraint } if constraint.ends_with("_email") => {
            CoreError::DuplicateEmail(email.to_string())
        }
        other => classify(other, "User", user_id),
    }
}
