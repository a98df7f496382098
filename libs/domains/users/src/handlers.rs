use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, ConflictResponse, ForbiddenResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use domain_auth::{AuthService, AuthUser, authorize_resource_access};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    LoginRequest, RefreshTokenRequest, RegisterUser, TokenResponse, UpdateUser, UserResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the auth and users endpoints
#[derive(OpenApi)]
#[openapi(
    paths(register, login, refresh_token, me, get_user, update_user, delete_user),
    components(
        schemas(RegisterUser, UpdateUser, LoginRequest, RefreshTokenRequest, TokenResponse, UserResponse),
        responses(
            BadRequestResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "auth", description = "Registration and bearer tokens"),
        (name = "users", description = "User profiles")
    )
)]
pub struct ApiDoc;

pub struct UsersState<R: UserRepository> {
    pub users: UserService<R>,
    pub auth: AuthService<UserService<R>>,
}

impl<R: UserRepository> UsersState<R> {
    pub fn new(users: UserService<R>, auth: AuthService<UserService<R>>) -> Arc<Self> {
        Arc::new(Self { users, auth })
    }
}

/// Public routes: `/auth/register`, `/auth/login`, `/auth/refresh-token`.
pub fn auth_router<R: UserRepository>(state: Arc<UsersState<R>>) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh-token", post(refresh_token))
        .with_state(state)
}

/// Routes that expect an [`AuthUser`] from `require_auth`.
pub fn router<R: UserRepository>(state: Arc<UsersState<R>>) -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(state)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(state): State<Arc<UsersState<R>>>,
    ValidatedJson(input): ValidatedJson<RegisterUser>,
) -> UserResult<impl IntoResponse> {
    let user = state.users.register(input).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(state): State<Arc<UsersState<R>>>,
    Json(input): Json<LoginRequest>,
) -> UserResult<Json<TokenResponse>> {
    let (identity, issued) = state.auth.login(&input.login, &input.password).await?;
    Ok(Json(TokenResponse::bearer(
        issued.token,
        issued.expires_at,
        identity.id,
        identity.username,
    )))
}

/// Exchange a still-valid token for a fresh one
#[utoipa::path(
    post,
    path = "/auth/refresh-token",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn refresh_token<R: UserRepository>(
    State(state): State<Arc<UsersState<R>>>,
    Json(input): Json<RefreshTokenRequest>,
) -> UserResult<Json<TokenResponse>> {
    let (identity, issued) = state.auth.refresh_token(&input.token).await?;
    Ok(Json(TokenResponse::bearer(
        issued.token,
        issued.expires_at,
        identity.id,
        identity.username,
    )))
}

/// Current user
#[utoipa::path(
    get,
    path = "/me",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated user", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn me<R: UserRepository>(
    State(state): State<Arc<UsersState<R>>>,
    auth: AuthUser,
) -> UserResult<Json<UserResponse>> {
    let user = state.users.get_by_id(auth.id).await?;
    Ok(Json(user.into()))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(state): State<Arc<UsersState<R>>>,
    _auth: AuthUser,
    UuidPath(id): UuidPath,
) -> UserResult<Json<UserResponse>> {
    let user = state.users.get_by_id(id).await?;
    Ok(Json(user.into()))
}

/// Update your own profile
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(state): State<Arc<UsersState<R>>>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResponse>> {
    authorize_resource_access(auth.id, id, "user")?;

    let user = state.users.update(id, input).await?;
    Ok(Json(user.into()))
}

/// Delete your own account
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(state): State<Arc<UsersState<R>>>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
) -> UserResult<impl IntoResponse> {
    authorize_resource_access(auth.id, id, "user")?;

    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
