use core_config::{ConfigError, FromEnv, env_first, env_parse};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct MongoConfig {
    pub url: String,
    pub database: String,
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout: Duration,
    pub server_selection_timeout: Duration,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout: Duration::from_secs(10),
            server_selection_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_pool_size(mut self, max: u32, min: u32) -> Self {
        self.max_pool_size = max;
        self.min_pool_size = min;
        self
    }
}

impl FromEnv for MongoConfig {
    /// - `MONGODB_URL` or `MONGO_URL` (required)
    /// - `MONGODB_DATABASE` or `MONGO_DATABASE` (required)
    /// - `MONGODB_APP_NAME`
    /// - `MONGODB_MAX_POOL_SIZE` (100), `MONGODB_MIN_POOL_SIZE` (5)
    /// - `MONGODB_CONNECT_TIMEOUT_SECS` (10), `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (30)
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_first(&["MONGODB_URL", "MONGO_URL"])
            .ok_or_else(|| ConfigError::MissingEnvVar("MONGODB_URL or MONGO_URL".to_string()))?;

        let database = env_first(&["MONGODB_DATABASE", "MONGO_DATABASE"]).ok_or_else(|| {
            ConfigError::MissingEnvVar("MONGODB_DATABASE or MONGO_DATABASE".to_string())
        })?;

        let max_pool_size = env_parse("MONGODB_MAX_POOL_SIZE", 100u32)?;
        let min_pool_size = env_parse("MONGODB_MIN_POOL_SIZE", 5u32)?;
        if min_pool_size > max_pool_size {
            return Err(ConfigError::InvalidValue {
                key: "MONGODB_MIN_POOL_SIZE".to_string(),
                details: format!("{min_pool_size} exceeds max pool size {max_pool_size}"),
            });
        }

        Ok(Self {
            url,
            database,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size,
            min_pool_size,
            connect_timeout: Duration::from_secs(env_parse("MONGODB_CONNECT_TIMEOUT_SECS", 10u64)?),
            server_selection_timeout: Duration::from_secs(env_parse(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                30u64,
            )?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 8] = [
        "MONGODB_URL",
        "MONGO_URL",
        "MONGODB_DATABASE",
        "MONGO_DATABASE",
        "MONGODB_APP_NAME",
        "MONGODB_MAX_POOL_SIZE",
        "MONGODB_MIN_POOL_SIZE",
        "MONGODB_CONNECT_TIMEOUT_SECS",
    ];

    #[test]
    fn test_builder() {
        let config = MongoConfig::new("mongodb://localhost:27017", "taskhub")
            .with_app_name("taskhub-api")
            .with_pool_size(20, 2);
        assert_eq!(config.database, "taskhub");
        assert_eq!(config.app_name.as_deref(), Some("taskhub-api"));
        assert_eq!((config.max_pool_size, config.min_pool_size), (20, 2));
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars_unset(VARS, || {
            temp_env::with_vars(
                [
                    ("MONGODB_URL", Some("mongodb://db:27017")),
                    ("MONGODB_DATABASE", Some("taskhub")),
                    ("MONGODB_CONNECT_TIMEOUT_SECS", Some("3")),
                ],
                || {
                    let config = MongoConfig::from_env().unwrap();
                    assert_eq!(config.url, "mongodb://db:27017");
                    assert_eq!(config.database, "taskhub");
                    assert_eq!(config.connect_timeout, Duration::from_secs(3));
                    assert_eq!(config.max_pool_size, 100);
                },
            );
        });
    }

    #[test]
    fn test_from_env_fallback_names() {
        temp_env::with_vars_unset(VARS, || {
            temp_env::with_vars(
                [
                    ("MONGO_URL", Some("mongodb://fallback:27017")),
                    ("MONGO_DATABASE", Some("fallbackdb")),
                ],
                || {
                    let config = MongoConfig::from_env().unwrap();
                    assert_eq!(config.url, "mongodb://fallback:27017");
                    assert_eq!(config.database, "fallbackdb");
                },
            );
        });
    }

    #[test]
    fn test_from_env_missing_url() {
        temp_env::with_vars_unset(VARS, || {
            temp_env::with_var("MONGODB_DATABASE", Some("taskhub"), || {
                assert!(matches!(
                    MongoConfig::from_env(),
                    Err(ConfigError::MissingEnvVar(_))
                ));
            });
        });
    }

    #[test]
    fn test_from_env_pool_bounds() {
        temp_env::with_vars_unset(VARS, || {
            temp_env::with_vars(
                [
                    ("MONGODB_URL", Some("mongodb://db:27017")),
                    ("MONGODB_DATABASE", Some("taskhub")),
                    ("MONGODB_MAX_POOL_SIZE", Some("4")),
                    ("MONGODB_MIN_POOL_SIZE", Some("8")),
                ],
                || {
                    assert!(matches!(
                        MongoConfig::from_env(),
                        Err(ConfigError::InvalidValue { .. })
                    ));
                },
            );
        });
    }
}
