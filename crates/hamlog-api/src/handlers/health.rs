//! Health check endpoint

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connectivity status
    pub database: DatabaseHealth,
}

/// Database health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseHealth {
    /// Whether `SELECT 1` succeeded
    pub connected: bool,
    /// Round-trip time of the probe in milliseconds
    pub response_time_ms: u64,
}

/// Report service and database health
///
/// Responds 200 when the database answers and 503 otherwise; the body has
/// the same shape in both cases.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let start = Instant::now();
    let probe = state.database.health_check().await;
    let response_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    let (status, label) = match probe {
        Ok(()) => {
            debug!(response_time_ms, "Health check passed");
            (StatusCode::OK, "healthy")
        }
        Err(e) => {
            error!("Database health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: DatabaseHealth {
                connected: status == StatusCode::OK,
                response_time_ms,
            },
        }),
    )
}
