use super::config::ServerConfig;
use tracing::info;

pub struct GrpcServer;

impl GrpcServer {
    pub fn log_startup(config: &ServerConfig, service_names: &[&str]) {
        info!(
            addr = %config.addr_string(),
            services = ?service_names,
            compression = config.enable_compression,
            timeout = ?config.request_timeout,
            "gRPC server starting"
        );
    }

    /// Marks each service, and the empty name used by generic probes, as serving.
    pub async fn setup_health(
        health_reporter: &tonic_health::server::HealthReporter,
        service_names: &[&str],
    ) {
        for service_name in service_names {
            health_reporter
                .set_service_status(*service_name, tonic_health::ServingStatus::Serving)
                .await;
        }

        health_reporter
            .set_service_status("", tonic_health::ServingStatus::Serving)
            .await;

        info!(services = ?service_names, "Services marked as serving");
    }
}

pub use tonic_health::server::health_reporter as create_health_service;
