//! Shared plumbing for the stockroom workspace: configuration, the storage
//! handle and its schema.

pub mod config;
pub mod database;
pub mod error;
pub mod migrations;

pub use config::{AppConfig, AuthConfig, DatabaseConfig, SeedConfig, ServerConfig};
pub use database::Database;
pub use error::{Result, StoreError};
pub use migrations::run_migrations;
