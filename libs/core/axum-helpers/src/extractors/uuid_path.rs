//! UUID path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use core_errors::ErrorKind;
use uuid::Uuid;

/// Single `{id}` path segment parsed as a UUID.
///
/// A malformed id is a 400 with the standard error body instead of axum's
/// plain-text path rejection.
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::new(ErrorKind::InvalidInput, e.body_text()))?;

        Uuid::parse_str(&id)
            .map(UuidPath)
            .map_err(|_| AppError::InvalidUuid(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    async fn show(UuidPath(id): UuidPath) -> String {
        id.to_string()
    }

    #[tokio::test]
    async fn test_parses_valid_uuid() {
        let id = Uuid::now_v7();
        let response = Router::new()
            .route("/tasks/{id}", get(show))
            .oneshot(
                Request::builder()
                    .uri(format!("/tasks/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_malformed_uuid() {
        let response = Router::new()
            .route("/tasks/{id}", get(show))
            .oneshot(
                Request::builder()
                    .uri("/tasks/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
