use thiserror::Error;

use crate::collection::CollectionError;

/// Root error of the task manager. Callers match on the variant to tell
/// bad input, missing records and storage failures apart.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}: {source}")]
    Persistence {
        message: String,
        #[source]
        source: CollectionError,
    },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(task_id: &str) -> Self {
        Self::NotFound(format!("Task {:?} not found.", task_id))
    }

    pub fn persistence(message: impl Into<String>, source: CollectionError) -> Self {
        Self::Persistence {
            message: message.into(),
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
