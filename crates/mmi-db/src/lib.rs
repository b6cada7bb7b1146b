pub mod collection;
pub mod config;
pub mod database;
pub mod error;

// Re-exports
pub use collection::PgCollection;
pub use config::{DatabaseConfig, DEFAULT_DATABASE_URL, TASKS_COLLECTION};
pub use database::Database;
pub use error::{Error, Result};
