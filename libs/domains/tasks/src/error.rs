use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use core_errors::{Classify, ErrorKind};
use domain_users::UserError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::TaskStatus;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(Uuid),

    #[error("Creator not found: {0}")]
    CreatorNotFound(Uuid),

    #[error("Assignee not found: {0}")]
    AssigneeNotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Cannot move task from {from} to {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },

    /// Failure while resolving a user through the directory.
    #[error(transparent)]
    User(#[from] UserError),

    #[error("Database error: {0}")]
    Database(String),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl Classify for TaskError {
    fn kind(&self) -> ErrorKind {
        match self {
            TaskError::NotFound(_)
            | TaskError::CreatorNotFound(_)
            | TaskError::AssigneeNotFound(_) => ErrorKind::NotFound,
            TaskError::Validation(_) => ErrorKind::InvalidInput,
            TaskError::Unauthorized(_) => ErrorKind::Unauthorized,
            TaskError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            TaskError::User(inner) => inner.kind(),
            TaskError::Database(_) => ErrorKind::Internal,
        }
    }
}

impl From<validator::ValidationErrors> for TaskError {
    fn from(errors: validator::ValidationErrors) -> Self {
        TaskError::Validation(axum_helpers::errors::validation_summary(&errors))
    }
}

impl From<mongodb::error::Error> for TaskError {
    fn from(err: mongodb::error::Error) -> Self {
        TaskError::Database(err.to_string())
    }
}

impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        AppError::from_domain(&err)
    }
}

impl From<TaskError> for tonic::Status {
    fn from(err: TaskError) -> Self {
        grpc_client::status_from(&err)
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (TaskError::NotFound(Uuid::now_v7()), StatusCode::NOT_FOUND),
            (TaskError::AssigneeNotFound(Uuid::now_v7()), StatusCode::NOT_FOUND),
            (TaskError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (TaskError::Unauthorized("x".into()), StatusCode::FORBIDDEN),
            (
                TaskError::InvalidTransition {
                    from: TaskStatus::Completed,
                    to: TaskStatus::Pending,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (TaskError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.kind().http_status(), status, "{}", err);
        }
    }

    #[test]
    fn test_user_error_kind_is_delegated() {
        let err = TaskError::from(UserError::Database("timeout".into()));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_transition_message() {
        let err = TaskError::InvalidTransition {
            from: TaskStatus::Completed,
            to: TaskStatus::Pending,
        };
        assert_eq!(err.to_string(), "Cannot move task from completed to pending");
        assert_eq!(tonic::Status::from(err).code(), tonic::Code::FailedPrecondition);
    }
}
