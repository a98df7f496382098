//! MongoDB connection management and driver helpers.

mod config;
mod connector;
mod errors;
mod health;

pub use config::MongoConfig;
pub use connector::{connect, connect_with_retry};
pub use errors::{DUPLICATE_KEY_CODE, duplicate_key_index, is_duplicate_key};
pub use health::check_health;

pub use mongodb::{Client, Collection, Database};
