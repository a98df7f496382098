//! Credentials and bearer tokens.
//!
//! Passwords are hashed with Argon2id and never leave this crate in clear
//! text. Tokens are HS256 JWTs minted by [`TokenService`]; there is no token
//! store, so expiry is the only way a token stops being accepted.
//!
//! The crate knows nothing about how users are stored. [`AuthService`] reaches
//! the user directory through the [`IdentityLookup`] trait, which the users
//! domain implements.
//!
//! Both transports authenticate through the same service:
//!
//! - [`middleware::require_auth`] for axum routes
//! - [`interceptor::BearerAuthInterceptor`] for tonic services
//!
//! ```rust,no_run
//! use domain_auth::{AuthConfig, TokenService};
//! use uuid::Uuid;
//!
//! let tokens = TokenService::new(&AuthConfig::new("0123456789abcdef0123456789abcdef"));
//! let issued = tokens.issue_token(Uuid::now_v7(), "alice").unwrap();
//! let user_id = tokens.validate_token(&issued.token).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod interceptor;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use interceptor::{BearerAuthInterceptor, authenticate_metadata};
pub use middleware::{AuthUser, require_auth};
pub use password::{hash_password, verify_password};
pub use service::{AuthService, Identity, IdentityLookup, ResourceKind, authorize_resource_access};
pub use token::{Claims, IssuedToken, TokenService};
