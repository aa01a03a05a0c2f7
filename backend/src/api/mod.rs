//! HTTP endpoints: GraphQL transport, health probes, and the API banner

pub mod graphql;
pub mod health;

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::app::AppState;

#[derive(Serialize)]
pub struct BannerResponse {
    pub active: bool,
    pub message: &'static str,
}

async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        active: true,
        message: "Hackernews API",
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(banner))
}
