//! Hacker News clone backend
//!
//! GraphQL API for posting links, voting, and following live feeds of new
//! links and votes. Exposed at `/graphql` (HTTP) and `/graphql/ws`
//! (subscriptions).

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod logging;
pub mod services;

pub use app::{AppState, build_app};
pub use config::Config;
