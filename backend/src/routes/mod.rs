//! Route definitions for the Ice Watch backend

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/latest", get(handlers::get_latest))
        .route("/history/:sensor_id", get(handlers::get_history))
        .route("/status", get(handlers::get_status))
}
