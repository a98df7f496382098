use super::AppError;
use axum::response::{IntoResponse, Response};
use core_errors::ErrorKind;

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    AppError::new(
        ErrorKind::NotFound,
        "The requested resource was not found",
    )
    .into_response()
}
