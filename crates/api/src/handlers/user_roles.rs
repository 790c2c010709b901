//! Handlers for the `/user-roles` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use gatehouse_core::identity::UserRole;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/user-roles
pub async fn assign_role(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(input): Json<UserRole>,
) -> AppResult<(StatusCode, Json<DataResponse<UserRole>>)> {
    let assignment = state.service.add_user_role(input).await?;
    tracing::info!(
        assigned_by = %caller.user_id,
        user_id = %assignment.user_id,
        role_id = %assignment.role_id,
        "Role assigned via API"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: assignment })))
}

/// DELETE /api/v1/user-roles
///
/// The pair to remove travels in the JSON body.
pub async fn revoke_role(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<UserRole>,
) -> AppResult<StatusCode> {
    state.service.remove_user_role(input).await?;
    Ok(StatusCode::NO_CONTENT)
}
