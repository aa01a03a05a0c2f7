//! Liveness and readiness probes

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Live subscriber count per pub/sub topic
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberCounts {
    pub new_link: usize,
    pub new_vote: usize,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub database: bool,
    pub subscribers: SubscriberCounts,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// 503 until the database answers a trivial query
async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let database = match sqlx::query("SELECT 1").execute(state.db.pool()).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            false
        }
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let subscribers = SubscriberCounts {
        new_link: state.pubsub.new_link.receiver_count(),
        new_vote: state.pubsub.new_vote.receiver_count(),
    };

    (
        status,
        Json(ReadyResponse {
            ready: database,
            database,
            subscribers,
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
