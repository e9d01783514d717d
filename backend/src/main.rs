//! Rideau Canal Ice Watch - Backend Server

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ice_watch::{create_app, external::CosmosStore, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ice_watch=debug,shared=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Rideau Canal Ice Watch backend");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        "Using Cosmos DB: {} / {}",
        config.cosmos.database,
        config.cosmos.container
    );

    let store = CosmosStore::new(&config.cosmos)?;

    // Create application state
    let state = AppState::new(Arc::new(store), config.clone());

    // Build application
    let app = create_app(state);

    // Start server
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
