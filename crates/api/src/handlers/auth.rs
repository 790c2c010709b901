//! Handlers for the `/auth` resource (signup, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use gatehouse_core::identity::{NewUser, UserResponse};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Self-service account creation. Returns the new user with 201 Created.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<NewUser>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let user = state.service.create_user(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Exchange email + password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let token = state.service.login(&input.email, &input.password).await?;

    Ok(Json(DataResponse {
        data: LoginResponse {
            token,
            token_type: "Bearer",
            expires_in: state.service.tokens().ttl().num_seconds(),
        },
    }))
}
