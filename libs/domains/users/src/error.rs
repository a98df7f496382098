use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use core_errors::{Classify, ErrorKind};
use domain_auth::AuthError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl Classify for UserError {
    fn kind(&self) -> ErrorKind {
        match self {
            UserError::NotFound(_) => ErrorKind::NotFound,
            UserError::DuplicateUsername(_) | UserError::DuplicateEmail(_) => {
                ErrorKind::DuplicateKey
            }
            UserError::InvalidCredentials => ErrorKind::InvalidCredentials,
            UserError::Validation(_) => ErrorKind::InvalidInput,
            UserError::Auth(inner) => inner.kind(),
            UserError::Database(_) => ErrorKind::Internal,
        }
    }
}

impl From<ValidationErrors> for UserError {
    fn from(errors: ValidationErrors) -> Self {
        UserError::Validation(axum_helpers::errors::validation_summary(&errors))
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        AppError::from_domain(&err)
    }
}

impl From<UserError> for tonic::Status {
    fn from(err: UserError) -> Self {
        grpc_client::status_from(&err)
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
