//! Application state and HTTP router construction.
//!
//! Used by [main] and by the router tests to build the Axum app.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::graphql::{HackerNewsSchema, build_schema};
use crate::services::{AuthConfig, AuthService, PubSub};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub auth: AuthService,
    pub pubsub: Arc<PubSub>,
    pub schema: HackerNewsSchema,
}

impl AppState {
    /// Wire the services and schema around an open database
    pub fn new(config: Arc<Config>, db: Database) -> Self {
        let auth = AuthService::new(db.clone(), AuthConfig::from_config(&config));
        let pubsub = Arc::new(PubSub::new(config.pubsub_capacity));
        let schema = build_schema(db.clone(), auth.clone(), pubsub.clone());

        Self {
            config,
            db,
            auth,
            pubsub,
            schema,
        }
    }

    /// Connect to the configured database, run migrations, and wire the services
    pub async fn from_config(config: Arc<Config>) -> Result<Self> {
        let db = Database::connect(&config.database_url, config.database_max_connections).await?;
        db.migrate().await?;
        Ok(Self::new(config, db))
    }
}

/// Build the full Axum router: banner, health probes, /graphql, /graphql/ws, and layers.
/// Returns Router<()> (state fully applied) for use with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::router())
        .merge(api::health::router())
        .merge(api::graphql::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
