//! API route definitions

use crate::{handlers, state::AppState};
use axum::{Router, http::StatusCode, response::Json, routing::get};
use std::sync::Arc;

/// QSO collection and item routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/v1/qsos",
            get(handlers::qsos::list_qsos).post(handlers::qsos::create_qso),
        )
        .route(
            "/api/v1/qsos/:id",
            get(handlers::qsos::get_qso)
                .put(handlers::qsos::update_qso)
                .delete(handlers::qsos::delete_qso),
        )
}

/// Health check routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Combine all routes into a single router
pub fn build_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(api_routes())
        .merge(health_routes())
        .fallback(not_found_handler)
}

/// Handle 404 Not Found errors
async fn not_found_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not Found",
            "code": "ROUTE_NOT_FOUND",
            "message": "The requested endpoint does not exist"
        })),
    )
}
