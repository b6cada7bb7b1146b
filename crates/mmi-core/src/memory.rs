//! In-process collection, used by tests and for running without a database.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use tokio::sync::RwLock;

use crate::collection::{Collection, CollectionError};
use crate::document::{Document, Filter, Sort, SortDirection, Update, ID_KEY};

#[derive(Default)]
pub struct MemoryCollection {
    documents: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn document_id(document: &Document) -> Result<&str, CollectionError> {
    document
        .get(ID_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| CollectionError::Malformed(format!("missing string {}", ID_KEY)))
}

fn contains_id(documents: &[Document], id: &str) -> bool {
    documents
        .iter()
        .any(|d| d.get(ID_KEY).and_then(Value::as_str) == Some(id))
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Missing fields sort with nulls, before everything else.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn insert_one(&self, document: Document) -> Result<(), CollectionError> {
        let mut documents = self.documents.write().await;

        let id = document_id(&document)?;
        if contains_id(&documents, id) {
            return Err(CollectionError::DuplicateKey(id.to_string()));
        }

        documents.push(document);
        Ok(())
    }

    async fn insert_many(&self, batch: Vec<Document>) -> Result<u64, CollectionError> {
        let mut documents = self.documents.write().await;
        let attempted = batch.len() as u64;
        let mut inserted = 0;

        for document in batch {
            let accepted = match document_id(&document) {
                Ok(id) => !contains_id(&documents, id),
                Err(_) => false,
            };
            if accepted {
                documents.push(document);
                inserted += 1;
            }
        }

        if inserted < attempted {
            return Err(CollectionError::BulkWrite {
                inserted,
                attempted,
            });
        }
        Ok(inserted)
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, CollectionError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| filter.matches(d)).cloned())
    }

    async fn find(
        &self,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>, CollectionError> {
        let documents = self.documents.read().await;
        let mut found: Vec<Document> = documents
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();

        if let Some(sort) = sort {
            found.sort_by(|a, b| {
                let ordering = compare_values(a.get(&sort.field), b.get(&sort.field));
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        Ok(found)
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<Document>, CollectionError> {
        let mut documents = self.documents.write().await;

        match documents.iter_mut().find(|d| filter.matches(d)) {
            Some(document) => {
                update.apply(document);
                Ok(Some(document.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_one(&self, filter: &Filter) -> Result<u64, CollectionError> {
        let mut documents = self.documents.write().await;

        match documents.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
