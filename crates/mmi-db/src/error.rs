use mmi_core::CollectionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid database configuration: {0}")]
    Config(String),

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

const UNIQUE_VIOLATION: &str = "23505";

/// Classify a driver error for callers that only know [`CollectionError`].
pub fn collection_error(err: sqlx::Error) -> CollectionError {
    match err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            CollectionError::DuplicateKey(db.message().to_string())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => CollectionError::Connection(err.to_string()),
        other => CollectionError::Query(other.to_string()),
    }
}

impl From<Error> for CollectionError {
    fn from(err: Error) -> Self {
        match err {
            Error::Config(message) => CollectionError::Other(anyhow::anyhow!(message)),
            Error::Connection(message) => CollectionError::Connection(message),
            Error::Sqlx(err) => collection_error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_connection_errors() {
        assert!(matches!(
            collection_error(sqlx::Error::PoolTimedOut),
            CollectionError::Connection(_)
        ));
        assert!(matches!(
            collection_error(sqlx::Error::PoolClosed),
            CollectionError::Connection(_)
        ));
    }

    #[test]
    fn test_other_errors_are_query_errors() {
        assert!(matches!(
            collection_error(sqlx::Error::RowNotFound),
            CollectionError::Query(_)
        ));
    }

    #[test]
    fn test_into_collection_error() {
        let err: CollectionError = Error::Connection("refused".to_string()).into();
        assert!(matches!(err, CollectionError::Connection(m) if m == "refused"));
    }
}
