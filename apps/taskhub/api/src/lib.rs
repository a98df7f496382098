//! Taskhub REST API
//!
//! ```text
//! /health                      liveness
//! /ready                       MongoDB ping
//! /api-docs/openapi.json       OpenAPI document
//! /api/v1/auth/*               registration and tokens (public)
//! /api/v1/{me,users,tasks}/*   bearer token required
//! ```

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

pub use config::Config;
pub use state::{AppState, Services};
