//! Signup and login mutations. Neither requires authentication.

use super::prelude::*;
use crate::services::{AuthResult, SignupInput};

impl From<AuthResult> for AuthPayload {
    fn from(result: AuthResult) -> Self {
        Self {
            token: result.token,
            user: User::from(result.user),
        }
    }
}

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Create an account and return a session token
    async fn signup(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
        name: String,
    ) -> Result<AuthPayload> {
        let auth = ctx.data_unchecked::<AuthService>();
        let result = auth
            .signup(SignupInput {
                name,
                email,
                password,
            })
            .await
            .into_gql()?;

        Ok(result.into())
    }

    /// Exchange e-mail and password for a session token
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthPayload> {
        let auth = ctx.data_unchecked::<AuthService>();
        let result = auth.login(&email, &password).await.into_gql()?;

        Ok(result.into())
    }
}
