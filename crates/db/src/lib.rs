//! Postgres adapter for the identity store.
//!
//! Table names are not fixed: they come from a [`TableNames`] set chosen per
//! deployment stage, and the schema is bootstrapped at startup with
//! [`schema::ensure_schema`].

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub use schema::{SchemaError, TableNames};
pub use store::PgIdentityStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
