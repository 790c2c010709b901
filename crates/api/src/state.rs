use std::sync::Arc;

use gatehouse_core::service::AccessService;
use gatehouse_core::token::TokenIssuer;
use gatehouse_db::{DbPool, PgIdentityStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used directly only by the health check.
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
    /// Account, role, and login operations over the configured tables.
    pub service: Arc<AccessService>,
}

impl AppState {
    /// Wire the Postgres store and token issuer into an [`AccessService`].
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        let store = PgIdentityStore::new(pool.clone(), config.tables.clone());
        let tokens = TokenIssuer::with_ttl(
            &config.jwt.secret,
            chrono::Duration::hours(config.jwt.token_ttl_hours),
        );

        Self {
            pool,
            config: Arc::new(config),
            service: Arc::new(AccessService::new(Arc::new(store), tokens)),
        }
    }
}
