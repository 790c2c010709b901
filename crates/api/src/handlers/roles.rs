//! Handlers for the `/roles` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gatehouse_core::identity::{NewRole, Role};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/roles
pub async fn list_roles(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Role>>>> {
    let roles = state.service.get_roles().await?;
    Ok(Json(DataResponse { data: roles }))
}

/// POST /api/v1/roles
///
/// Creating a role whose name and description match an existing one returns
/// that role instead of a new one.
pub async fn create_role(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<NewRole>,
) -> AppResult<(StatusCode, Json<DataResponse<Role>>)> {
    let role = state.service.create_role(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: role })))
}

/// GET /api/v1/roles/{id}
pub async fn get_role(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(role_id): Path<String>,
) -> AppResult<Json<DataResponse<Role>>> {
    let role = state.service.get_role_by_id(&role_id).await?;
    Ok(Json(DataResponse { data: role }))
}

/// PUT /api/v1/roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(role_id): Path<String>,
    Json(input): Json<NewRole>,
) -> AppResult<Json<DataResponse<Role>>> {
    let role = state.service.update_role(&role_id, input).await?;
    Ok(Json(DataResponse { data: role }))
}

/// DELETE /api/v1/roles/{id}
///
/// 409 while any user still holds the role.
pub async fn delete_role(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(role_id): Path<String>,
) -> AppResult<StatusCode> {
    state.service.delete_role(&role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
