//! Signing configuration for bearer tokens.

use chrono::{Duration, Utc};
use core_config::{ConfigError, FromEnv, env_parse, env_required};

pub const MIN_SECRET_LEN: usize = 32;
pub const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Loaded from:
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_EXPIRY_HOURS` (default 24, positive)
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    /// Config with the default 24h TTL.
    ///
    /// # Panics
    /// Panics if the secret is shorter than 32 characters. Meant for tests and
    /// wiring code that already validated the secret.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= MIN_SECRET_LEN,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            token_ttl: Duration::hours(DEFAULT_EXPIRY_HOURS),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl FromEnv for AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidValue {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least {} characters (got {}). Generate one with: openssl rand -base64 32",
                    MIN_SECRET_LEN,
                    secret.len()
                ),
            });
        }

        let hours: i64 = env_parse("JWT_EXPIRY_HOURS", DEFAULT_EXPIRY_HOURS)?;
        if hours <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "JWT_EXPIRY_HOURS".to_string(),
                details: format!("must be a positive number of hours (got {})", hours),
            });
        }

        let token_ttl = Duration::try_hours(hours)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "JWT_EXPIRY_HOURS".to_string(),
                details: format!("{} hours is out of range", hours),
            })?;

        Ok(Self { secret, token_ttl })
    }
}
