//! Application configuration management

use std::env;
use std::net::{IpAddr, Ipv4Addr};

use anyhow::{Context, Result, bail};
use base64::Engine;

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// SQLite connection URL (e.g. `sqlite://hackernews.db` or `sqlite::memory:`)
    pub database_url: String,

    /// Maximum pool size
    pub database_max_connections: u32,

    /// HMAC secret used to sign and verify tokens
    pub api_secret: String,

    /// True when no secret was configured and one was generated for this process
    pub api_secret_generated: bool,

    /// Token lifetime in seconds
    pub token_lifetime: i64,

    /// Bcrypt cost factor
    pub bcrypt_cost: u32,

    /// Capacity of each pub/sub channel
    pub pubsub_capacity: usize,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("API_PORT")
            .or_else(|| lookup("PORT"))
            .unwrap_or_else(|| "4000".to_string())
            .parse()
            .context("Invalid API_PORT")?;

        let host = match lookup("HOST") {
            Some(h) => h.parse().context("Invalid HOST")?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://hackernews.db".to_string());

        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;

        let (api_secret, api_secret_generated) = match lookup("API_SECRET")
            .or_else(|| lookup("JWT_SECRET"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            Some(secret) => (secret, false),
            None => (generate_secret(), true),
        };

        let token_lifetime: i64 = parse_or(&lookup, "TOKEN_LIFETIME", 7 * 24 * 60 * 60)?;
        if token_lifetime <= 0 {
            bail!("TOKEN_LIFETIME must be positive, got {}", token_lifetime);
        }

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31, got {}", bcrypt_cost);
        }

        let pubsub_capacity: usize = parse_or(&lookup, "PUBSUB_CAPACITY", 256)?;
        if pubsub_capacity == 0 {
            bail!("PUBSUB_CAPACITY must be greater than zero");
        }

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => bail!("Invalid LOG_FORMAT '{}', expected 'json' or 'pretty'", other),
        };

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            api_secret,
            api_secret_generated,
            token_lifetime,
            bcrypt_cost,
            pubsub_capacity,
            log_format,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: '{}'", key, raw)),
        None => Ok(default),
    }
}

fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.database_url, "sqlite://hackernews.db");
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.token_lifetime, 604800);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.pubsub_capacity, 256);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.api_secret_generated);
        assert!(!config.api_secret.is_empty());
    }

    #[test]
    fn test_api_port_takes_precedence() {
        let config = config_from(&[("API_PORT", "8080"), ("PORT", "9090")]).unwrap();
        assert_eq!(config.port, 8080);

        let config = config_from(&[("PORT", "9090")]).unwrap();
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_secret_is_trimmed() {
        let config = config_from(&[("API_SECRET", "  s3cret\n")]).unwrap();
        assert_eq!(config.api_secret, "s3cret");
        assert!(!config.api_secret_generated);

        let config = config_from(&[("JWT_SECRET", "fallback")]).unwrap();
        assert_eq!(config.api_secret, "fallback");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("API_PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("BCRYPT_COST", "2")]).is_err());
        assert!(config_from(&[("PUBSUB_CAPACITY", "0")]).is_err());
        assert!(config_from(&[("TOKEN_LIFETIME", "-5")]).is_err());
        assert!(config_from(&[("LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn test_pretty_logs() {
        let config = config_from(&[("LOG_FORMAT", "pretty")]).unwrap();
        assert_eq!(config.log_format, LogFormat::Pretty);
    }
}
