pub mod auth;
pub mod health;
pub mod home;
pub mod roles;
pub mod user_roles;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                    signup (public)
/// /auth/login                     login (public)
///
/// /users                          list, create
/// /users/lookup                   find by email (POST)
/// /users/{id}                     get, update profile, delete
/// /users/{id}/password            change password (PUT)
/// /users/roles/{role_name}        users holding a role
///
/// /roles                          list, create
/// /roles/{id}                     get, update, delete
///
/// /user-roles                     assign (POST), revoke (DELETE)
/// ```
///
/// Everything except `/auth` requires a token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/roles", roles::router())
        .nest("/user-roles", user_roles::router())
}
