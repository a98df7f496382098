//! Readiness endpoint

use axum::{Router, extract::State, response::Response, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use mongodb::Database;

pub fn router(db: Database) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(db)
}

/// 200 when MongoDB answers a ping, 503 otherwise.
async fn readiness_check(State(db): State<Database>) -> Response {
    let mongodb: HealthCheckFuture<'_> = Box::pin(database::mongodb::check_health(&db));
    run_health_checks(vec![("mongodb", mongodb)]).await
}
