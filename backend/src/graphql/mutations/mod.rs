pub mod auth;
pub mod links;
pub mod votes;

pub use auth::AuthMutations;
pub use links::LinkMutations;
pub use votes::VoteMutations;

pub(crate) mod prelude {
    pub(crate) use std::sync::Arc;

    pub(crate) use async_graphql::{Context, Object, Result};

    pub(crate) use crate::db::*;
    pub(crate) use crate::error::{ApiError, IntoGqlResult};
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::{AuthService, PubSub};
}
