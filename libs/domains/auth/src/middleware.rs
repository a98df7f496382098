use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_helpers::AppError;
use serde::Serialize;
use uuid::Uuid;

use crate::token::{Claims, TokenService};

/// Caller identity attached to the request by [`require_auth`] or the gRPC interceptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

impl AuthUser {
    pub fn from_claims(claims: Claims) -> Result<Self, crate::AuthError> {
        Ok(Self {
            id: claims.user_id()?,
            username: claims.username,
        })
    }

    /// Reads the caller from a tonic request that went through the interceptor.
    pub fn from_request<T>(request: &tonic::Request<T>) -> Result<Self, tonic::Status> {
        request
            .extensions()
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| tonic::Status::unauthenticated("Missing authentication"))
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthenticated("Missing authentication"))
    }
}

fn bearer_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects the request with 401 unless it carries a valid `Authorization: Bearer` token.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/me", get(me))
///     .layer(axum::middleware::from_fn_with_state(tokens.clone(), require_auth));
/// ```
pub async fn require_auth(
    State(tokens): State<TokenService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_from_headers(request.headers()) else {
        tracing::debug!("no bearer token in Authorization header");
        return Err(AppError::unauthenticated("Missing bearer token"));
    };

    let user = tokens
        .decode_claims(token)
        .and_then(AuthUser::from_claims)
        .map_err(AppError::from)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
