//! Taskhub gRPC service
//!
//! ## Architecture
//!
//! ```text
//! Client (TaskhubClient)
//!   ↓ (gRPC, zstd, bearer token in `authorization` metadata)
//! TaskServiceImpl / UserServiceImpl
//!   ↓ (proto ↔ domain conversions via From/TryFrom)
//! TaskService / UserService / AuthService (domain layer)
//!   ↓
//! MongoTaskRepository / MongoUserRepository
//! ```
//!
//! ## Modules
//!
//! - `server`: configuration, wiring and lifecycle
//! - `tasks`: `taskhub.v1.TaskService`
//! - `users`: `taskhub.v1.UserService`
//! - `client`: typed client over both services

pub mod client;
pub mod config;
pub mod server;
pub mod tasks;
pub mod users;

pub use client::{TaskhubClient, TokenValidation};
pub use config::Config;
pub use server::{router, run};
pub use tasks::TaskServiceImpl;
pub use users::UserServiceImpl;
