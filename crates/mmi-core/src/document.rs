//! Generic document records and the query shapes used against a collection.

use serde_json::{Map, Value};

/// A flat, storage-native record: field name to primitive value.
pub type Document = Map<String, Value>;

/// Key holding a document's identity.
pub const ID_KEY: &str = "_id";

/// Conjunction of exact-equality constraints. An empty filter matches
/// every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Document,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::new().eq(ID_KEY, id)
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn fields(&self) -> &Document {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True if every constrained field is present in `document` with an
    /// equal value. A `null` constraint also matches a missing field.
    pub fn matches(&self, document: &Document) -> bool {
        self.fields.iter().all(|(key, expected)| {
            match document.get(key) {
                Some(actual) => actual == expected,
                None => expected.is_null(),
            }
        })
    }
}

/// A `$set`-style update: listed fields are overwritten, the rest are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    set: Document,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// The identity key is never updatable and is silently dropped.
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        if field != ID_KEY {
            self.set.insert(field.to_string(), value.into());
        }
        self
    }

    pub fn fields(&self) -> &Document {
        &self.set
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn apply(&self, document: &mut Document) {
        for (key, value) in &self.set {
            document.insert(key.clone(), value.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn ascending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_filter_matches_all_fields() {
        let record = doc(json!({"_id": "a", "status": "pending", "priority_level": "high"}));

        assert!(Filter::new().matches(&record));
        assert!(Filter::by_id("a").matches(&record));
        assert!(Filter::new()
            .eq("status", "pending")
            .eq("priority_level", "high")
            .matches(&record));
        assert!(!Filter::new()
            .eq("status", "pending")
            .eq("priority_level", "low")
            .matches(&record));
    }

    #[test]
    fn test_null_filter_matches_missing_field() {
        let record = doc(json!({"_id": "a"}));
        assert!(Filter::new().eq("due_date", Value::Null).matches(&record));
        assert!(!Filter::new().eq("due_date", "2025-01-01").matches(&record));
    }

    #[test]
    fn test_update_never_touches_id() {
        let mut record = doc(json!({"_id": "a", "title": "old"}));
        let update = Update::new().set("_id", "b").set("title", "new");

        update.apply(&mut record);
        assert_eq!(record["_id"], "a");
        assert_eq!(record["title"], "new");
    }
}
