//! Database
//!
//! Postgres pool creation and schema bootstrap.

pub mod connection;

pub use connection::{connect, mask_database_url, run_migrations};
