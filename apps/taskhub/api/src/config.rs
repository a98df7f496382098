use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_auth::AuthConfig;

pub use core_config::Environment;

/// Application configuration, assembled once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let app = app_info!();
        let mongodb = MongoConfig::from_env()?.with_app_name(app.name);
        let server = ServerConfig::from_env()?;
        let auth = AuthConfig::from_env()?;

        Ok(Self {
            app,
            mongodb,
            server,
            auth,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "config-test-secret-0123456789abcdef";

    #[test]
    fn test_from_env_collects_every_section() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("taskhub")),
                ("JWT_SECRET", Some(SECRET)),
                ("JWT_EXPIRY_HOURS", Some("2")),
                ("PORT", Some("9000")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "taskhub_api");
                assert_eq!(config.mongodb.database, "taskhub");
                assert_eq!(config.mongodb.app_name.as_deref(), Some("taskhub_api"));
                assert_eq!(config.server.port, 9000);
                assert_eq!(config.auth.token_ttl.num_hours(), 2);
            },
        );
    }

    #[test]
    fn test_missing_secret_fails() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("taskhub")),
                ("JWT_SECRET", None),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_SECRET"));
            },
        );
    }
}
