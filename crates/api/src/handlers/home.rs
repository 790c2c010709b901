//! Handler for the authenticated root endpoint.

use axum::Json;
use serde::Serialize;

use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub user_id: String,
}

/// GET /
///
/// Confirms the caller's token and echoes who they are.
pub async fn home(user: AuthUser) -> Json<DataResponse<HomeResponse>> {
    Json(DataResponse {
        data: HomeResponse {
            service: "gatehouse",
            version: env!("CARGO_PKG_VERSION"),
            user_id: user.user_id,
        },
    })
}
