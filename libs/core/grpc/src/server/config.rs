use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use std::net::SocketAddr;
use std::time::Duration;

/// gRPC listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_compression: bool,
    pub max_message_size: usize,
    /// Deadline applied to every call by the server.
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50051,
            enable_compression: true,
            max_message_size: 8 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl FromEnv for ServerConfig {
    /// `GRPC_HOST`, `GRPC_PORT`, `GRPC_COMPRESSION` (`false`/`0` disables),
    /// `GRPC_MAX_MESSAGE_SIZE` and `REQUEST_TIMEOUT_SECS`.
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let enable_compression = !matches!(
            env_or_default("GRPC_COMPRESSION", "true").trim(),
            "false" | "0"
        );

        Ok(Self {
            host: env_or_default("GRPC_HOST", &defaults.host),
            port: env_parse("GRPC_PORT", defaults.port)?,
            enable_compression,
            max_message_size: env_parse("GRPC_MAX_MESSAGE_SIZE", defaults.max_message_size)?,
            request_timeout: Duration::from_secs(env_parse("REQUEST_TIMEOUT_SECS", 30u64)?),
        })
    }
}

impl ServerConfig {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_compression(mut self, enable: bool) -> Self {
        self.enable_compression = enable;
        self
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.addr_string().parse()
    }

    pub fn addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 5] = [
        "GRPC_HOST",
        "GRPC_PORT",
        "GRPC_COMPRESSION",
        "GRPC_MAX_MESSAGE_SIZE",
        "REQUEST_TIMEOUT_SECS",
    ];

    #[test]
    fn test_defaults_from_env() {
        temp_env::with_vars_unset(VARS, || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.addr_string(), "0.0.0.0:50051");
            assert!(config.enable_compression);
            assert_eq!(config.request_timeout, Duration::from_secs(30));
            assert!(config.socket_addr().is_ok());
        });
    }

    #[test]
    fn test_overrides_from_env() {
        temp_env::with_vars(
            [
                ("GRPC_HOST", Some("127.0.0.1")),
                ("GRPC_PORT", Some("6000")),
                ("GRPC_COMPRESSION", Some("false")),
                ("REQUEST_TIMEOUT_SECS", Some("3")),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.socket_addr().unwrap().port(), 6000);
                assert!(!config.enable_compression);
                assert_eq!(config.request_timeout, Duration::from_secs(3));
            },
        );
    }

    #[test]
    fn test_bad_port() {
        temp_env::with_var("GRPC_PORT", Some("http"), || {
            assert!(ServerConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::default()
            .with_host("[::1]")
            .with_port(7000)
            .with_compression(false);
        assert_eq!(config.addr_string(), "[::1]:7000");
        assert!(!config.enable_compression);
    }
}
