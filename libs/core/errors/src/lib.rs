//! Error kinds shared by every domain crate and both transports.
//!
//! Domain errors implement [`Classify`]. The REST layer asks the kind for an
//! HTTP status and the gRPC layer asks it for a `tonic::Code`, so the two
//! transports can never disagree about how a failure is reported.
//!
//! ```rust
//! use core_errors::ErrorKind;
//!
//! assert_eq!(ErrorKind::NotFound.http_status(), http::StatusCode::NOT_FOUND);
//! assert_eq!(ErrorKind::NotFound.grpc_code(), tonic::Code::NotFound);
//! assert_eq!(ErrorKind::NotFound.as_str(), "NOT_FOUND");
//! ```

use http::StatusCode;
use std::fmt;

/// Message returned to clients for every [`ErrorKind::Internal`] failure.
pub const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    /// Authenticated, but not allowed to touch the resource.
    Unauthorized,
    DuplicateKey,
    InvalidCredentials,
    InvalidToken,
    InvalidTransition,
    Internal,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::NotFound,
        ErrorKind::InvalidInput,
        ErrorKind::Unauthorized,
        ErrorKind::DuplicateKey,
        ErrorKind::InvalidCredentials,
        ErrorKind::InvalidToken,
        ErrorKind::InvalidTransition,
        ErrorKind::Internal,
    ];

    /// Machine-readable identifier used in the `error` field of JSON bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidInput => "INVALID_ARGUMENT",
            Self::Unauthorized => "PERMISSION_DENIED",
            Self::DuplicateKey => "ALREADY_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// Integer code for logs and dashboards.
    pub fn code(&self) -> i32 {
        match self {
            Self::Internal => 1000,
            Self::InvalidInput => 1001,
            Self::InvalidCredentials => 1002,
            Self::Unauthorized => 1003,
            Self::NotFound => 1004,
            Self::DuplicateKey => 1005,
            Self::InvalidToken => 1006,
            Self::InvalidTransition => 1007,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::NotFound => "Resource not found",
            Self::InvalidInput => "Invalid input",
            Self::Unauthorized => "Not allowed to access this resource",
            Self::DuplicateKey => "Resource already exists",
            Self::InvalidCredentials => "Invalid credentials",
            Self::InvalidToken => "Invalid or expired token",
            Self::InvalidTransition => "Invalid status transition",
            Self::Internal => INTERNAL_MESSAGE,
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::DuplicateKey => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::InvalidTransition => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn grpc_code(&self) -> tonic::Code {
        match self {
            Self::NotFound => tonic::Code::NotFound,
            Self::InvalidInput => tonic::Code::InvalidArgument,
            Self::Unauthorized => tonic::Code::PermissionDenied,
            Self::DuplicateKey => tonic::Code::AlreadyExists,
            Self::InvalidCredentials | Self::InvalidToken => tonic::Code::Unauthenticated,
            Self::InvalidTransition => tonic::Code::FailedPrecondition,
            Self::Internal => tonic::Code::Internal,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every domain error so transports can map it uniformly.
pub trait Classify {
    fn kind(&self) -> ErrorKind;
}

/// Text safe to hand to a client.
///
/// Internal failures collapse to [`INTERNAL_MESSAGE`] and the real cause is
/// logged here, once, at `error` level.
pub fn public_message<E>(err: &E) -> String
where
    E: Classify + fmt::Display + ?Sized,
{
    match err.kind() {
        ErrorKind::Internal => {
            tracing::error!(error_code = ErrorKind::Internal.code(), error = %err, "internal error");
            INTERNAL_MESSAGE.to_string()
        }
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Boom(ErrorKind, &'static str);

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.1)
        }
    }

    impl Classify for Boom {
        fn kind(&self) -> ErrorKind {
            self.0
        }
    }

    #[test]
    fn test_http_and_grpc_agree_on_auth_failures() {
        for kind in [ErrorKind::InvalidCredentials, ErrorKind::InvalidToken] {
            assert_eq!(kind.http_status(), StatusCode::UNAUTHORIZED);
            assert_eq!(kind.grpc_code(), tonic::Code::Unauthenticated);
        }
        assert_eq!(ErrorKind::Unauthorized.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::Unauthorized.grpc_code(), tonic::Code::PermissionDenied);
    }

    #[test]
    fn test_table_rows() {
        let rows = [
            (ErrorKind::NotFound, 404, tonic::Code::NotFound),
            (ErrorKind::InvalidInput, 400, tonic::Code::InvalidArgument),
            (ErrorKind::DuplicateKey, 409, tonic::Code::AlreadyExists),
            (ErrorKind::InvalidTransition, 422, tonic::Code::FailedPrecondition),
            (ErrorKind::Internal, 500, tonic::Code::Internal),
        ];
        for (kind, status, code) in rows {
            assert_eq!(kind.http_status().as_u16(), status, "{kind}");
            assert_eq!(kind.grpc_code(), code, "{kind}");
        }
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<i32> = ErrorKind::ALL.iter().map(ErrorKind::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ErrorKind::ALL.len());
    }

    #[test]
    fn test_public_message_hides_internal_detail() {
        let err = Boom(ErrorKind::Internal, "connection reset by mongod at 10.0.0.4");
        assert_eq!(public_message(&err), INTERNAL_MESSAGE);
    }

    #[test]
    fn test_public_message_passes_domain_detail() {
        let err = Boom(ErrorKind::NotFound, "task not found");
        assert_eq!(public_message(&err), "task not found");
    }
}
