//! Conversion between [`Task`] and its stored [`Document`].
//!
//! Writing is strict (a `Task` is already valid), reading is permissive:
//! missing optional fields fall back to their defaults and the stored title
//! is trusted as written. Only records that cannot be read at all are
//! rejected.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;

use crate::collection::CollectionError;
use crate::document::{Document, ID_KEY};
use crate::task::{Priority, Status, Task, DATE_FORMAT};

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const DUE_DATE: &str = "due_date";
pub const PRIORITY_LEVEL: &str = "priority_level";
pub const STATUS: &str = "status";
pub const CREATED_AT: &str = "created_at";

/// Nanosecond RFC 3339 in UTC with a `Z` suffix: fixed width, so string
/// order matches time order.
pub fn timestamp_value(timestamp: DateTime<Utc>) -> Value {
    Value::String(timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true))
}

pub fn date_value(date: Option<NaiveDate>) -> Value {
    match date {
        Some(date) => Value::String(date.format(DATE_FORMAT).to_string()),
        None => Value::Null,
    }
}

pub fn to_document(task: &Task) -> Document {
    let mut document = Document::new();
    document.insert(ID_KEY.to_string(), Value::String(task.id.clone()));
    document.insert(TITLE.to_string(), Value::String(task.title.clone()));
    document.insert(
        DESCRIPTION.to_string(),
        Value::String(task.description.clone()),
    );
    document.insert(DUE_DATE.to_string(), date_value(task.due_date));
    document.insert(
        PRIORITY_LEVEL.to_string(),
        Value::String(task.priority.as_str().to_string()),
    );
    document.insert(
        STATUS.to_string(),
        Value::String(task.status.as_str().to_string()),
    );
    document.insert(CREATED_AT.to_string(), timestamp_value(task.created_at));
    document
}

pub fn from_document(document: &Document) -> Result<Task, CollectionError> {
    let id = required_str(document, ID_KEY)?;
    let title = required_str(document, TITLE)?;

    let description = optional_str(document, DESCRIPTION)?.unwrap_or_default();

    let due_date = optional_str(document, DUE_DATE)?
        .map(|raw| parse_stored_date(raw, id))
        .transpose()?;

    let priority = optional_str(document, PRIORITY_LEVEL)?
        .map(|raw| raw.parse::<Priority>())
        .transpose()
        .map_err(|e| malformed(id, e))?
        .unwrap_or_default();

    let status = optional_str(document, STATUS)?
        .map(|raw| raw.parse::<Status>())
        .transpose()
        .map_err(|e| malformed(id, e))?
        .unwrap_or_default();

    let created_at = match optional_str(document, CREATED_AT)? {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| malformed(id, e))?
            .with_timezone(&Utc),
        // Records without a stored time still sort first in listings.
        None => Utc::now(),
    };

    Ok(Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        due_date,
        priority,
        status,
        created_at,
    })
}

fn malformed(id: &str, reason: impl std::fmt::Display) -> CollectionError {
    CollectionError::Malformed(format!("task {:?}: {}", id, reason))
}

fn required_str<'a>(document: &'a Document, key: &str) -> Result<&'a str, CollectionError> {
    optional_str(document, key)?
        .ok_or_else(|| CollectionError::Malformed(format!("missing field {:?}", key)))
}

/// `null` counts as missing.
fn optional_str<'a>(document: &'a Document, key: &str) -> Result<Option<&'a str>, CollectionError> {
    match document.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(CollectionError::Malformed(format!(
            "field {:?} should be a string, found {}",
            key, other
        ))),
    }
}

/// Accepts plain dates and, for older records, full timestamps.
fn parse_stored_date(raw: &str, id: &str) -> Result<NaiveDate, CollectionError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|ts| ts.date_naive()))
        .map_err(|e| malformed(id, e))
}
