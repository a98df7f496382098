pub use tonic::service::Interceptor;

pub mod auth;

pub use auth::{AuthInterceptor, bearer_token};
