//! Route definitions for the `/users` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                    -> list_users
/// POST   /                    -> create_user
/// POST   /lookup              -> lookup_user
/// GET    /roles/{role_name}   -> users_with_role
/// GET    /{id}                -> get_user
/// PUT    /{id}                -> update_user
/// DELETE /{id}                -> delete_user
/// PUT    /{id}/password       -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/lookup", post(users::lookup_user))
        .route("/roles/{role_name}", get(users::users_with_role))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/{id}/password", put(users::change_password))
}
