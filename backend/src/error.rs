//! Errors surfaced through the GraphQL error channel

use async_graphql::ErrorExtensions;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthenticated!")]
    Unauthenticated,

    #[error("E-mail or password is incorrect")]
    InvalidCredentials,

    #[error("A user with this e-mail already exists")]
    EmailTaken,

    #[error("Invalid link id: {0}")]
    InvalidLinkId(String),

    #[error("Link not found: {0}")]
    LinkNotFound(i64),

    #[error("Already voted for link: {0}")]
    AlreadyVoted(i64),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Machine-readable code placed in `extensions.code`
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated | Self::InvalidCredentials => "UNAUTHENTICATED",
            Self::InvalidLinkId(_) | Self::InvalidArgument(_) => "BAD_USER_INPUT",
            Self::LinkNotFound(_) => "NOT_FOUND",
            Self::EmailTaken | Self::AlreadyVoted(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        if let Self::Internal(e) = self {
            tracing::error!(error = ?e, "Request failed");
        }
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Convert service results into GraphQL results carrying the error code
pub trait IntoGqlResult<T> {
    fn into_gql(self) -> async_graphql::Result<T>;
}

impl<T, E> IntoGqlResult<T> for std::result::Result<T, E>
where
    E: Into<ApiError>,
{
    fn into_gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.into().extend())
    }
}
