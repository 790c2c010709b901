//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use gatehouse_core::error::CoreError;
use gatehouse_core::types::EntityId;

use crate::error::AppError;
use crate::state::AppState;

/// Alternate header carrying a bare token, kept for older clients.
pub const ACCESS_TOKEN_HEADER: &str = "access_token";

/// Authenticated caller extracted from a verified token.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: EntityId,
    /// The user's email at token issuance.
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?;

        let claims = state.service.authenticate(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Core(e)
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

impl AuthUser {
    /// Reject with 403 unless the caller is the account being acted on.
    pub fn require_self(&self, user_id: &str) -> Result<(), AppError> {
        if self.user_id != user_id {
            tracing::warn!(
                caller = %self.user_id,
                target = %user_id,
                "Rejected action on another account"
            );
            return Err(AppError::Core(CoreError::Forbidden(
                "You may only perform this action on your own account".into(),
            )));
        }
        Ok(())
    }
}

/// Pull the raw token from `Authorization: Bearer <token>`, falling back to
/// the `access_token` header.
fn extract_token(headers: &HeaderMap) -> Result<&str, AppError> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| AppError::Unauthorized("Malformed Authorization header".into()))?;
        return value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                )
            });
    }

    if let Some(value) = headers.get(ACCESS_TOKEN_HEADER) {
        return value
            .to_str()
            .ok()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Malformed access_token header".into()));
    }

    Err(AppError::Unauthorized("Missing Authorization header".into()))
}
