//! Authentication service for user management and JWT handling
//!
//! Provides:
//! - Signup and login
//! - Password hashing with bcrypt
//! - JWT token generation and validation

use anyhow::{Context, Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::{CreateUser, Database, UserRecord, is_unique_violation};
use crate::error::{ApiError, ApiResult};

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// User ID
    pub user_id: i64,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

// ============================================================================
// Auth Types
// ============================================================================

/// Signup input
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Token and user returned by signup and login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub user: UserRecord,
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_lifetime: i64,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            jwt_secret: config.api_secret.clone(),
            token_lifetime: config.token_lifetime,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Register a new user and sign them in
    pub async fn signup(&self, input: SignupInput) -> ApiResult<AuthResult> {
        let users = self.db.users();

        if users.get_by_email(&input.email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }

        let password_hash = self.hash_password(input.password).await?;

        // A concurrent signup can still win the race; the UNIQUE index catches it.
        let user = match users
            .create(CreateUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await
        {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => return Err(ApiError::EmailTaken),
            Err(e) => return Err(e.into()),
        };

        let token = self.issue_token(user.id)?;
        tracing::info!(user_id = user.id, "User signed up");

        Ok(AuthResult { token, user })
    }

    /// Login with e-mail and password.
    ///
    /// Unknown e-mail and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResult> {
        let Some(user) = self.db.users().get_by_email(email).await? else {
            tracing::warn!("Login attempt for unknown e-mail");
            return Err(ApiError::InvalidCredentials);
        };

        if !self
            .verify_password(password.to_string(), user.password_hash.clone())
            .await?
        {
            tracing::warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.issue_token(user.id)?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok(AuthResult { token, user })
    }

    /// Resolve the user a token belongs to.
    ///
    /// Returns `None` for tokens that fail verification or whose user no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<Option<UserRecord>> {
        let claims = match self.verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Token verification failed");
                return Ok(None);
            }
        };

        self.db.users().get_by_id(claims.user_id).await
    }

    /// Sign a token for a user
    pub fn issue_token(&self, user_id: i64) -> Result<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            user_id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.token_lifetime)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| anyhow!("Failed to create token: {}", e))
    }

    /// Decode and validate a token
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Hash a password with bcrypt on the blocking pool
    async fn hash_password(&self, password: String) -> Result<String> {
        let cost = self.config.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("Password hashing task failed")?
            .map_err(|e| anyhow!("Failed to hash password: {}", e))
    }

    /// Verify a password against a hash on the blocking pool
    async fn verify_password(&self, password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .context("Password verification task failed")?
            .map_err(|e| anyhow!("Failed to verify password: {}", e))
    }
}
