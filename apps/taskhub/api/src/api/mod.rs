//! API routes

pub mod health;

use axum::Router;
use axum_helpers::server::{create_router, health_router};
use core_config::AppInfo;
use core_config::server::ServerConfig;
use domain_auth::require_auth;
use domain_tasks::TaskRepository;
use domain_users::{UserRepository, UsersState};

use crate::openapi::ApiDoc;
use crate::state::Services;

/// `/v1` routes. Registration and token endpoints are public, everything else
/// goes through `require_auth`. Nested under `/api` by `create_router`.
pub fn routes<U: UserRepository, T: TaskRepository>(services: &Services<U, T>) -> Router {
    let users_state = UsersState::new(services.users.clone(), services.auth.clone());

    let protected = domain_users::handlers::router(users_state.clone())
        .merge(domain_tasks::handlers::router(services.tasks.clone()))
        .layer(axum::middleware::from_fn_with_state(
            services.tokens.clone(),
            require_auth,
        ));

    Router::new().nest(
        "/v1",
        domain_users::handlers::auth_router(users_state).merge(protected),
    )
}

/// Full HTTP app minus `/ready`, which needs a live database handle.
pub fn app<U: UserRepository, T: TaskRepository>(
    services: &Services<U, T>,
    server: &ServerConfig,
    app_info: AppInfo,
) -> std::io::Result<Router> {
    let router = create_router::<ApiDoc>(routes(services), server)?;
    Ok(router.merge(health_router(app_info)))
}
