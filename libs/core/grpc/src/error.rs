use core_errors::Classify;
use std::fmt;
use thiserror::Error;
use tonic::Status;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors raised while building client channels.
#[derive(Error, Debug)]
pub enum GrpcError {
  #[error("Invalid URI: {0}")]
  InvalidUri(#[source] tonic::transport::Error),

  #[error("Connection failed: {0}")]
  ConnectionFailed(#[source] tonic::transport::Error),
}

impl From<GrpcError> for Status {
  fn from(err: GrpcError) -> Self {
    match err {
      GrpcError::InvalidUri(_) => Status::invalid_argument(err.to_string()),
      GrpcError::ConnectionFailed(_) => Status::unavailable(err.to_string()),
    }
  }
}

/// Builds a `Status` from any classified domain error.
///
/// The code comes from the shared kind table. Internal failures are logged and
/// replaced with a generic message.
pub fn status_from<E>(err: &E) -> Status
where
  E: Classify + fmt::Display + ?Sized,
{
  let kind = err.kind();
  Status::new(kind.grpc_code(), core_errors::public_message(err))
}

/// `?`-friendly conversion of domain results inside tonic handlers.
///
/// ```ignore
/// let task = self.service.get(id).await.to_tonic()?;
/// ```
pub trait ToTonicResult<T> {
  fn to_tonic(self) -> Result<T, Status>;
}

impl<T, E> ToTonicResult<T> for Result<T, E>
where
  E: Classify + fmt::Display,
{
  fn to_tonic(self) -> Result<T, Status> {
    self.map_err(|e| status_from(&e))
  }
}
