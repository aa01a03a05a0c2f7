//! Services behind the GraphQL resolvers

pub mod auth;
pub mod pubsub;

pub use auth::{AuthConfig, AuthResult, AuthService, SignupInput, TokenClaims};
pub use pubsub::{PubSub, Topic};
