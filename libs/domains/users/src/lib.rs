//! Users Domain
//!
//! Registration, profile management and credential checks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (auth + profiles)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, password hashing, uniqueness pre-checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory and MongoDB implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs
//! └─────────────┘
//! ```
//!
//! `UserService` also implements `domain_auth::IdentityLookup`, which is how
//! login and token refresh reach the user directory.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_auth::{AuthConfig, AuthService, TokenService};
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let users = UserService::new(InMemoryUserRepository::new());
//! let tokens = TokenService::new(&AuthConfig::new("0123456789abcdef0123456789abcdef"));
//! let auth = AuthService::new(tokens, users.clone());
//!
//! let state = handlers::UsersState::new(users, auth);
//! let public = handlers::auth_router(state.clone());
//! let protected = handlers::router(state);
//! ```

pub mod conversions;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, UsersState};
pub use models::{
    LoginRequest, RefreshTokenRequest, RegisterUser, TokenResponse, UpdateUser, User, UserResponse,
};
pub use self::mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
