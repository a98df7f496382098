use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::RetryConfig;
use eyre::WrapErr;
use taskhub_api::{AppState, Config, api};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env().wrap_err("Failed to load configuration")?;
    init_tracing(&config.environment);

    info!(app = %config.app, database = %config.mongodb.database, "Connecting to MongoDB");
    let mongo_client = database::mongodb::connect_with_retry(&config.mongodb, &RetryConfig::default())
        .await
        .wrap_err("Failed to connect to MongoDB")?;

    let state = AppState::new(config, mongo_client)
        .await
        .wrap_err("Failed to prepare collections")?;

    let app = api::app(&state.services, &state.config.server, state.config.app.clone())?
        .merge(api::health::router(state.db.clone()));

    info!(
        "Starting {} ({:?} shutdown timeout)",
        state.config.app, state.config.server.shutdown_timeout
    );

    let server_config = state.config.server.clone();
    create_production_app(app, &server_config, async move {
        info!("Shutting down: closing MongoDB connections");
        state.mongo_client.shutdown().await;
        info!("MongoDB connection closed");
    })
    .await
    .wrap_err("Server error")?;

    info!("Taskhub API shutdown complete");
    Ok(())
}
