//! Client channels with the HTTP/2 settings used across services.

use crate::error::{GrpcError, GrpcResult};
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

#[derive(Debug, Clone)]
pub struct ChannelConfig {
  pub connect_timeout: Duration,
  /// Per-call deadline applied by the channel.
  pub request_timeout: Duration,
  pub http2_keep_alive_interval: Option<Duration>,
  pub keep_alive_timeout: Duration,
  pub tcp_nodelay: bool,
}

impl Default for ChannelConfig {
  fn default() -> Self {
    Self {
      connect_timeout: Duration::from_secs(5),
      request_timeout: Duration::from_secs(30),
      http2_keep_alive_interval: Some(Duration::from_secs(30)),
      keep_alive_timeout: Duration::from_secs(10),
      tcp_nodelay: true,
    }
  }
}

impl ChannelConfig {
  fn endpoint(&self, addr: &str) -> GrpcResult<Endpoint> {
    let mut endpoint = Endpoint::from_shared(addr.to_string()).map_err(|e| {
      tracing::error!(target: "grpc_client", addr = %addr, error = ?e, "Invalid URI");
      GrpcError::InvalidUri(e)
    })?;

    if let Some(interval) = self.http2_keep_alive_interval {
      endpoint = endpoint
        .http2_keep_alive_interval(interval)
        .keep_alive_while_idle(true);
    }

    Ok(
      endpoint
        .keep_alive_timeout(self.keep_alive_timeout)
        .connect_timeout(self.connect_timeout)
        .timeout(self.request_timeout)
        .tcp_nodelay(self.tcp_nodelay),
    )
  }
}

pub async fn create_channel(addr: impl Into<String>) -> GrpcResult<Channel> {
  create_channel_with_config(addr, ChannelConfig::default()).await
}

/// Connects eagerly, so an unreachable server fails here rather than on the first call.
pub async fn create_channel_with_config(
  addr: impl Into<String>,
  config: ChannelConfig,
) -> GrpcResult<Channel> {
  let addr = addr.into();
  let endpoint = config.endpoint(&addr)?;

  tracing::debug!(target: "grpc_client", addr = %addr, "Creating gRPC channel");

  endpoint.connect().await.map_err(|e| {
    tracing::error!(
      target: "grpc_client",
      addr = %addr,
      error = ?e,
      "Failed to connect to gRPC service"
    );
    GrpcError::ConnectionFailed(e)
  })
}
