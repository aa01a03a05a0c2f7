//! Hacker News clone backend - entry point

use std::net::SocketAddr;
use std::sync::Arc;

use hackernews::{AppState, Config, build_app, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    logging::init_tracing(config.log_format);
    tracing::info!("Starting Hackernews API");

    if config.api_secret_generated {
        tracing::warn!("API_SECRET is not set; using a random secret, tokens will not survive a restart");
    }

    let state = AppState::from_config(config.clone()).await?;
    tracing::info!(database = %config.database_url, "Database connected and migrated");

    let app = build_app(state);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://localhost:{}/graphql", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
