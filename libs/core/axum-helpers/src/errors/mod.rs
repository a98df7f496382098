pub mod handlers;
pub mod responses;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_errors::{Classify, ErrorKind};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Task not found: 0191...",
///   "details": null
/// }
/// ```
#[derive(Debug, Serialize, serde::Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Structured details, e.g. per-field validation failures
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code: kind.code(),
            error: kind.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Error type returned by handlers.
///
/// Domain crates convert their own errors with [`AppError::from_domain`], which
/// keeps the status code decision in `core_errors`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("{message}")]
    Domain { kind: ErrorKind, message: String },
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        AppError::Domain {
            kind,
            message: message.into(),
        }
    }

    /// Internal detail is logged by `public_message` and replaced before it leaves the process.
    pub fn from_domain<E>(err: &E) -> Self
    where
        E: Classify + fmt::Display + ?Sized,
    {
        AppError::Domain {
            kind: err.kind(),
            message: core_errors::public_message(err),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::JsonExtractorRejection(_)
            | AppError::ValidationError(_)
            | AppError::InvalidUuid(_) => ErrorKind::InvalidInput,
            AppError::Domain { kind, .. } => *kind,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message, details) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = kind.code(), "JSON extraction error: {:?}", e);
                (e.status(), e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = kind.code(), "Validation error: {:?}", e);
                (
                    StatusCode::BAD_REQUEST,
                    "Request validation failed".to_string(),
                    Some(validation_details(&e)),
                )
            }
            AppError::InvalidUuid(raw) => {
                tracing::info!(error_code = kind.code(), "Invalid UUID: {}", raw);
                (
                    StatusCode::BAD_REQUEST,
                    format!("Invalid UUID: {}", raw),
                    None,
                )
            }
            AppError::Domain { kind, message } => {
                match kind {
                    ErrorKind::Internal => {}
                    ErrorKind::InvalidCredentials | ErrorKind::InvalidToken => {
                        tracing::debug!(error_code = kind.code(), "{}", message)
                    }
                    _ => tracing::info!(error_code = kind.code(), "{}", message),
                }
                (kind.http_status(), message, None)
            }
        };

        let body = Json(ErrorResponse {
            code: kind.code(),
            error: kind.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// One-line summary of validator output, e.g. for a domain `Validation(String)` error.
///
/// Field messages are used when present and sorted so the text is stable.
pub fn validation_summary(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// Flattens validator output into `{ field: [{code, message, params}] }`.
fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let details = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::json!(messages))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(details)
}
