//! GraphQL authentication and authorization
//!
//! The context factory stores a [CurrentUser] in every request. Resolvers that
//! need a signed-in user call [AuthExt::verify_auth]:
//!
//! ```ignore
//! async fn me(&self, ctx: &Context<'_>) -> Result<User> {
//!     let user = ctx.verify_auth()?;
//!     Ok(User::from(user.clone()))
//! }
//! ```

use async_graphql::{Context, ErrorExtensions, Result};

use crate::db::UserRecord;
use crate::error::ApiError;

/// The user resolved from the request's bearer token, if any
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<UserRecord>);

impl CurrentUser {
    pub fn anonymous() -> Self {
        Self(None)
    }
}

/// Extension trait to get the authenticated user from GraphQL context
pub trait AuthExt {
    /// The current user, or None for anonymous requests
    fn current_user(&self) -> Option<&UserRecord>;

    /// The current user, or an `Unauthenticated!` error
    fn verify_auth(&self) -> Result<&UserRecord>;
}

impl<'a> AuthExt for Context<'a> {
    fn current_user(&self) -> Option<&UserRecord> {
        self.data_opt::<CurrentUser>().and_then(|u| u.0.as_ref())
    }

    fn verify_auth(&self) -> Result<&UserRecord> {
        self.current_user()
            .ok_or_else(|| ApiError::Unauthenticated.extend())
    }
}
