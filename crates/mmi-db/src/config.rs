//! Database configuration

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/task_manager";
pub const TASKS_COLLECTION: &str = "tasks";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Collection (table) holding task documents
    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_collection() -> String {
    TASKS_COLLECTION.to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            collection: default_collection(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::Config("database url is empty".to_string()));
        }
        if self.max_connections == 0 {
            return Err(Error::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        validate_collection_name(&self.collection)
    }
}

/// Collection names are interpolated into SQL as table names, so only plain
/// identifiers are accepted.
pub fn validate_collection_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && name.len() <= 63 {
        Ok(())
    } else {
        Err(Error::Config(format!("invalid collection name: {:?}", name)))
    }
}
