//! Route definitions for the `/user-roles` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::user_roles;
use crate::state::AppState;

/// Routes mounted at `/user-roles`.
///
/// ```text
/// POST   /   -> assign_role
/// DELETE /   -> revoke_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        post(user_roles::assign_role).delete(user_roles::revoke_role),
    )
}
