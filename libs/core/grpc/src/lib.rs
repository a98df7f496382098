//! # gRPC helpers
//!
//! Shared tonic plumbing for the gRPC server and its clients.
//!
//! - [`error`]: domain error to `tonic::Status` through `core_errors::ErrorKind`
//! - [`conversions`]: wire strings and unix timestamps to domain types
//! - [`interceptors`]: client-side `authorization` metadata and server-side token extraction
//! - [`channel`]: client channel creation with HTTP/2 tuning
//! - [`server`]: listener configuration and health reporting
//!
//! ```ignore
//! use grpc_client::{AuthInterceptor, create_channel};
//! use rpc::taskhub::v1::task_service_client::TaskServiceClient;
//!
//! let channel = create_channel("http://[::1]:50051").await?;
//! let client = TaskServiceClient::with_interceptor(channel, AuthInterceptor::bearer(token));
//! ```

pub mod channel;
pub mod conversions;
pub mod error;
pub mod interceptors;
pub mod server;

pub use channel::{ChannelConfig, create_channel, create_channel_with_config};
pub use error::{GrpcError, GrpcResult, ToTonicResult, status_from};
pub use interceptors::{AuthInterceptor, bearer_token};
