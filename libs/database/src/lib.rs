//! MongoDB bootstrap: configuration, connection with retry and health checks.
//!
//! ```ignore
//! use database::mongodb::{self, MongoConfig};
//! use core_config::FromEnv;
//!
//! let config = MongoConfig::from_env()?;
//! let client = mongodb::connect_with_retry(&config, &RetryConfig::default()).await?;
//! let db = client.database(&config.database);
//! ```
//!
//! Retries only apply to establishing the connection. Once connected, store
//! errors propagate to the caller untouched.

pub mod common;
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
