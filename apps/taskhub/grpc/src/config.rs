use core_config::{AppInfo, Environment, FromEnv, app_info};
use database::mongodb::MongoConfig;
use domain_auth::AuthConfig;
use grpc_client::server::ServerConfig;

/// gRPC server configuration, assembled once at startup.
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
        let app = app_info!();

        Ok(Self {
            mongodb: MongoConfig::from_env()?.with_app_name(app.name),
            server: ServerConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            environment: Environment::from_env(),
            app,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None),
                ("MONGODB_DATABASE", None),
                ("MONGO_URL", Some("mongodb://localhost:27017")),
                ("MONGO_DATABASE", Some("taskhub")),
                ("JWT_SECRET", Some("grpc-config-secret-0123456789abcdef")),
                ("GRPC_PORT", Some("6001")),
                ("GRPC_COMPRESSION", Some("0")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "taskhub_grpc");
                assert_eq!(config.mongodb.database, "taskhub");
                assert_eq!(config.server.port, 6001);
                assert!(!config.server.enable_compression);
            },
        );
    }

    #[test]
    fn test_short_secret_fails() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("taskhub")),
                ("JWT_SECRET", Some("short")),
            ],
            || assert!(Config::from_env().is_err()),
        );
    }
}
