//! GraphQL API with subscriptions for the live feeds
//!
//! Queries: `info`, `feed`, `me`. Mutations: `post`, `signup`, `login`, `vote`.
//! Subscriptions: `newLink`, `newVote`.

pub mod auth;
pub mod context;
pub mod mutations;
pub mod queries;
mod schema;
mod subscriptions;
pub mod types;

pub use auth::{AuthExt, CurrentUser};
pub use schema::{HackerNewsSchema, MutationRoot, QueryRoot, build_schema};
pub use subscriptions::SubscriptionRoot;
