//! hamlog REST API server library

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use state::AppState;

use axum::Router;
use hamlog_core::{Config, Result};
use hamlog_database::Database;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

/// Build the API router with all routes and middleware
///
/// Request tracing is left to the caller so tests can run without it.
///
/// # Errors
///
/// Returns an error if the configured reference tables are malformed.
pub fn build_router(config: Config, database: Database) -> Result<Router> {
    let state = Arc::new(AppState::new(config, database)?);

    let mut app = routes::build_router().layer(TimeoutLayer::new(Duration::from_secs(
        state.config.api.request_timeout,
    )));
    if state.config.api.enable_cors {
        app = app.layer(middleware::cors_layer(&state.config.api));
    }

    Ok(app.with_state(state))
}
