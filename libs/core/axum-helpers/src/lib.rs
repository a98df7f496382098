//! # Axum Helpers
//!
//! Shared plumbing for the HTTP surface.
//!
//! - **[`errors`]**: `AppError` and the JSON error body, driven by `core_errors::ErrorKind`
//! - **[`extractors`]**: validated JSON bodies and UUID path parameters
//! - **[`server`]**: router assembly, health and readiness, graceful shutdown
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes, &server_config)?
//!     .merge(health_router(app_info!()));
//! create_production_app(router, &server_config, async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use errors::{AppError, ErrorResponse};

pub use extractors::{UuidPath, ValidatedJson};
