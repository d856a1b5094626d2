//! Configuration
//!
//! Environment-driven service settings and Postgres pool settings.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::{ConfigError, EnvironmentConfig};
