//! gRPC server initialization and lifecycle management
//!
//! - Tracing initialization
//! - MongoDB connection and index setup
//! - Service creation
//! - gRPC server configuration and startup
//! - Health check service (grpc.health.v1.Health)

use axum_helpers::server::shutdown_signal;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::RetryConfig;
use domain_auth::{AuthService, BearerAuthInterceptor, TokenService};
use domain_tasks::{MongoTaskRepository, TaskRepository, TaskService};
use domain_users::{MongoUserRepository, UserRepository, UserService};
use eyre::{Result, WrapErr};
use grpc_client::server::{GrpcServer, ServerConfig, create_health_service};
use rpc::taskhub::v1::{
    task_service_server::TaskServiceServer, user_service_server::UserServiceServer,
};
use tonic::codec::CompressionEncoding;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Server;
use tonic::transport::server::Router;
use tracing::info;

use crate::config::Config;
use crate::tasks::TaskServiceImpl;
use crate::users::UserServiceImpl;

pub const TASK_SERVICE_NAME: &str = "taskhub.v1.TaskService";
pub const USER_SERVICE_NAME: &str = "taskhub.v1.UserService";

/// Run the gRPC server until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if configuration is invalid, MongoDB is unreachable,
/// the listen address does not parse, or the server fails at runtime.
pub async fn run() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env().wrap_err("Failed to load configuration")?;
    init_tracing(&config.environment);

    info!(app = %config.app, database = %config.mongodb.database, "Connecting to MongoDB");
    let client = database::mongodb::connect_with_retry(&config.mongodb, &RetryConfig::default())
        .await
        .wrap_err("Failed to connect to MongoDB")?;
    let db = client.database(&config.mongodb.database);

    let user_repository = MongoUserRepository::new(&db);
    user_repository.ensure_indexes().await?;
    let task_repository = MongoTaskRepository::new(&db);
    task_repository.ensure_indexes().await?;

    let users = UserService::new(user_repository);
    let auth = AuthService::new(TokenService::new(&config.auth), users.clone());
    let tasks = TaskService::new(task_repository, users.clone());

    let addr = config
        .server
        .socket_addr()
        .wrap_err_with(|| format!("Failed to parse server address: {}", config.server.addr_string()))?;

    let (health_reporter, health_service) = create_health_service();
    let service_names = [TASK_SERVICE_NAME, USER_SERVICE_NAME];
    GrpcServer::setup_health(&health_reporter, &service_names).await;

    GrpcServer::log_startup(&config.server, &service_names);

    router(&config.server, tasks, users, auth)
        .add_service(health_service)
        .serve_with_shutdown(addr, shutdown_signal())
        .await
        .wrap_err("gRPC server failed")?;

    info!("Closing MongoDB connections");
    client.shutdown().await;
    info!("Taskhub gRPC shutdown complete");
    Ok(())
}

/// Both services behind one router. `TaskService` requires a bearer token on
/// every call; `UserService` checks tokens per method.
pub fn router<U, T>(
    config: &ServerConfig,
    tasks: TaskService<T, U>,
    users: UserService<U>,
    auth: AuthService<UserService<U>>,
) -> Router
where
    U: UserRepository,
    T: TaskRepository,
{
    let interceptor = BearerAuthInterceptor::new(auth.tokens().clone());

    let mut task_server = TaskServiceServer::new(TaskServiceImpl::new(tasks))
        .max_decoding_message_size(config.max_message_size);
    let mut user_server = UserServiceServer::new(UserServiceImpl::new(users, auth))
        .max_decoding_message_size(config.max_message_size);
    if config.enable_compression {
        task_server = task_server
            .accept_compressed(CompressionEncoding::Zstd)
            .send_compressed(CompressionEncoding::Zstd);
        user_server = user_server
            .accept_compressed(CompressionEncoding::Zstd)
            .send_compressed(CompressionEncoding::Zstd);
    }

    Server::builder()
        .timeout(config.request_timeout)
        .add_service(InterceptedService::new(task_server, interceptor))
        .add_service(user_server)
}
