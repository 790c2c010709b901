//! Handlers for the `/users` resource.
//!
//! All handlers require a valid token via [`AuthUser`]. Users are always
//! rendered through [`UserResponse`], so the password hash never leaves the
//! service.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gatehouse_core::error::CoreError;
use gatehouse_core::identity::{NewUser, ProfileUpdate, Role, User, UserResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users/lookup`.
#[derive(Debug, Deserialize, Validate)]
pub struct EmailLookupRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

/// Request body for `PUT /users/{id}/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

/// A user together with the roles they hold.
#[derive(Debug, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: UserResponse,
    pub roles: Vec<Role>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = state.service.get_users().await?;
    Ok(Json(DataResponse {
        data: to_responses(users),
    }))
}

/// POST /api/v1/users
///
/// Create a user on someone else's behalf. Same rules as signup.
pub async fn create_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(input): Json<NewUser>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let user = state.service.create_user(input).await?;
    tracing::info!(created_by = %caller.user_id, user_id = %user.user_id, "User created via API");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// POST /api/v1/users/lookup
///
/// Find a user by email. The email travels in the body rather than the URL.
pub async fn lookup_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<EmailLookupRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let user = state.service.get_user_by_email(&input.email).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// GET /api/v1/users/{id}
///
/// Returns the user and the roles assigned to them.
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<DataResponse<UserDetail>>> {
    let (user, roles) = state.service.get_user_with_roles(&user_id).await?;
    Ok(Json(DataResponse {
        data: UserDetail {
            user: UserResponse::from(user),
            roles,
        },
    }))
}

/// PUT /api/v1/users/{id}
///
/// Replace profile fields. The password is changed through its own endpoint.
pub async fn update_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(user_id): Path<String>,
    Json(input): Json<ProfileUpdate>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = state.service.update_profile(&user_id, input).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/users/{id}/password
///
/// Only the account holder may change their own password.
pub async fn change_password(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(user_id): Path<String>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    caller.require_self(&user_id)?;
    state
        .service
        .change_password(&user_id, &input.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/users/{id}
///
/// Hard-delete a user and their role assignments. Returns 204 No Content.
pub async fn delete_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<StatusCode> {
    state.service.delete_user(&user_id).await?;
    tracing::info!(deleted_by = %caller.user_id, user_id = %user_id, "User deleted via API");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/roles/{role_name}
pub async fn users_with_role(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(role_name): Path<String>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = state.service.get_users_with_role(&role_name).await?;
    Ok(Json(DataResponse {
        data: to_responses(users),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_responses(users: Vec<User>) -> Vec<UserResponse> {
    users.into_iter().map(UserResponse::from).collect()
}
