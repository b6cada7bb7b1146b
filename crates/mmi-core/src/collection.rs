use async_trait::async_trait;
use thiserror::Error;

use crate::document::{Document, Filter, Sort, Update};

/// Failure reported by a storage engine.
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("bulk write inserted {inserted} of {attempted} documents")]
    BulkWrite { inserted: u64, attempted: u64 },

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A named grouping of documents with filter-based access.
///
/// Atomicity of `find_one_and_update` and uniqueness of `_id` are the
/// implementation's responsibility.
#[async_trait]
pub trait Collection: Send + Sync {
    async fn insert_one(&self, document: Document) -> Result<(), CollectionError>;

    /// Unordered insert: a document that fails does not stop the others.
    /// Returns the number inserted, or `BulkWrite` if any were rejected.
    async fn insert_many(&self, documents: Vec<Document>) -> Result<u64, CollectionError>;

    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, CollectionError>;

    async fn find(
        &self,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>, CollectionError>;

    /// Apply `update` to the first match and return the updated document.
    async fn find_one_and_update(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<Document>, CollectionError>;

    /// Returns the number of deleted documents (0 or 1).
    async fn delete_one(&self, filter: &Filter) -> Result<u64, CollectionError>;
}
