//! Per-request context factory
//!
//! Turns the `Authorization` header (or the WebSocket `connection_init`
//! payload) into a [CurrentUser]. Bad or expired tokens leave the request
//! anonymous; resolvers that need a user fail with `Unauthenticated!`.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use crate::services::AuthService;

use super::CurrentUser;

/// Extract the token from an `Authorization` value such as `Bearer <token>`.
///
/// The scheme word is not checked; the token is whatever follows the first space.
pub fn token_from_authorization(value: &str) -> Option<&str> {
    value
        .trim()
        .split_once(' ')
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}

/// Extract the bearer token from request headers
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(token_from_authorization)
}

/// Extract the token from a WebSocket `connection_init` payload
pub fn token_from_init_payload(params: &serde_json::Value) -> Option<&str> {
    let value = params
        .get("Authorization")
        .or_else(|| params.get("authorization"))
        .and_then(|v| v.as_str())?;

    // Clients send either "Bearer <token>" or the bare token
    token_from_authorization(value).or_else(|| Some(value.trim()).filter(|t| !t.is_empty()))
}

/// Resolve the current user for an optional token
pub async fn resolve_user(auth: &AuthService, token: Option<&str>) -> CurrentUser {
    let Some(token) = token else {
        tracing::debug!("No auth token in request");
        return CurrentUser::anonymous();
    };

    match auth.authenticate(token).await {
        Ok(Some(user)) => {
            tracing::debug!(user_id = user.id, "Auth successful");
            CurrentUser(Some(user))
        }
        Ok(None) => CurrentUser::anonymous(),
        Err(e) => {
            tracing::error!(error = ?e, "Failed to load user for token");
            CurrentUser::anonymous()
        }
    }
}

/// Resolve the current user from request headers
pub async fn from_headers(auth: &AuthService, headers: &HeaderMap) -> CurrentUser {
    resolve_user(auth, extract_token(headers)).await
}

/// Resolve the user for a WebSocket session.
///
/// A token in the `connection_init` payload replaces the user resolved from
/// the upgrade headers, even when that token turns out to be invalid.
pub async fn from_connection_init(
    auth: &AuthService,
    params: &serde_json::Value,
    header_user: CurrentUser,
) -> CurrentUser {
    match token_from_init_payload(params) {
        Some(token) => resolve_user(auth, Some(token)).await,
        None => header_user,
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use serde_json::json;

    use crate::db::{Database, UserRecord};
    use crate::services::{AuthConfig, SignupInput};

    use super::*;

    async fn signup(auth: &AuthService, name: &str) -> (String, UserRecord) {
        let result = auth
            .signup(SignupInput {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                password: "password".to_string(),
            })
            .await
            .unwrap();
        (result.token, result.user)
    }

    #[test]
    fn test_token_from_authorization() {
        assert_eq!(token_from_authorization("Bearer abc.def"), Some("abc.def"));
        assert_eq!(token_from_authorization("  Bearer   abc  "), Some("abc"));
        assert_eq!(token_from_authorization("abc"), None);
        assert_eq!(token_from_authorization("Bearer "), None);
    }

    #[test]
    fn test_extract_token_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(extract_token(&headers), Some("tok"));
    }

    #[test]
    fn test_token_from_init_payload() {
        assert_eq!(
            token_from_init_payload(&json!({"Authorization": "Bearer tok"})),
            Some("tok")
        );
        assert_eq!(
            token_from_init_payload(&json!({"authorization": "tok"})),
            Some("tok")
        );
        assert_eq!(token_from_init_payload(&json!({})), None);
        assert_eq!(token_from_init_payload(&json!({"authorization": 5})), None);
    }

    #[tokio::test]
    async fn test_connection_init_payload_overrides_headers() {
        let db = Database::connect_in_memory().await.unwrap();
        let auth = AuthService::new(
            db,
            AuthConfig {
                jwt_secret: "ws-tests".to_string(),
                token_lifetime: 3600,
                bcrypt_cost: 4,
            },
        );
        let (ann_token, ann) = signup(&auth, "Ann").await;
        let (bob_token, bob) = signup(&auth, "Bob").await;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", ann_token)).unwrap(),
        );
        let header_user = from_headers(&auth, &headers).await;
        assert_eq!(header_user.0.as_ref(), Some(&ann));

        // Payload token wins over the upgrade headers
        let payload = json!({ "Authorization": format!("Bearer {}", bob_token) });
        let user = from_connection_init(&auth, &payload, header_user.clone()).await;
        assert_eq!(user.0, Some(bob));

        // No token in the payload keeps the header user
        let user = from_connection_init(&auth, &json!({}), header_user.clone()).await;
        assert_eq!(user.0, Some(ann));

        // A bad payload token leaves the session anonymous
        let payload = json!({ "authorization": "garbage" });
        let user = from_connection_init(&auth, &payload, header_user).await;
        assert_eq!(user.0, None);
    }
}
