//! Rideau Canal Ice Watch - Backend
//!
//! Read-only API over the sensor aggregate store, plus the static dashboard
//! frontend.

use axum::{routing::get, Router};
use std::{path::Path, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;

use services::DashboardService;
use store::AggregateStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn AggregateStore>, config: Config) -> Self {
        Self {
            dashboard: DashboardService::new(store),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes());

    with_frontend(router, &state.config.server.static_dir)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the dashboard bundle, falling back to `index.html` for unknown paths
fn with_frontend(router: Router<AppState>, static_dir: &Path) -> Router<AppState> {
    if !static_dir.is_dir() {
        tracing::warn!(
            "Static directory {} not found; frontend will not be served",
            static_dir.display()
        );
        return router;
    }

    let index = ServeFile::new(static_dir.join("index.html"));
    router.fallback_service(ServeDir::new(static_dir).fallback(index))
}
