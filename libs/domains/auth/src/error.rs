use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use core_errors::{Classify, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token subject no longer resolves to a user.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Not allowed to access this {0}")]
    Unauthorized(String),

    #[error("Unknown resource kind: {0}")]
    UnknownResourceKind(String),

    #[error("Identity lookup failed: {0}")]
    Lookup(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl Classify for AuthError {
    fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Hashing(_) | AuthError::Signing(_) | AuthError::Lookup(_) => {
                ErrorKind::Internal
            }
            AuthError::InvalidToken | AuthError::UserNotFound(_) => ErrorKind::InvalidToken,
            AuthError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AuthError::Unauthorized(_) => ErrorKind::Unauthorized,
            AuthError::UnknownResourceKind(_) => ErrorKind::InvalidInput,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::from_domain(&err)
    }
}

impl From<AuthError> for tonic::Status {
    fn from(err: AuthError) -> Self {
        grpc_client::status_from(&err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_unknown_user_on_refresh_is_401() {
        let err = AuthError::UserNotFound(Uuid::now_v7());
        assert_eq!(err.kind().http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(tonic::Status::from(err).code(), tonic::Code::Unauthenticated);
    }

    #[test]
    fn test_signing_failure_is_masked() {
        let status = tonic::Status::from(AuthError::Signing("bad key".into()));
        assert_eq!(status.code(), tonic::Code::Internal);
        assert_eq!(status.message(), core_errors::INTERNAL_MESSAGE);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(AuthError::InvalidCredentials.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(AuthError::Unauthorized("task".into()).kind(), ErrorKind::Unauthorized);
        assert_eq!(
            AuthError::UnknownResourceKind("comment".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            IntoResponse::into_response(AuthError::InvalidToken).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
