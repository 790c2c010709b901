//! Gatehouse HTTP gateway library.
//!
//! Exposes config, state, error handling, and the router builder so
//! integration tests and the binary entrypoint share one construction path.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
