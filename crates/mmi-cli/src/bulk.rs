use anyhow::{Context, Result};
use mmi_core::{Error, NewTask};
use serde_json::Value;
use std::path::Path;

/// Read a bulk file: a JSON array of task objects.
pub fn load_tasks_file(path: &Path) -> Result<Vec<NewTask>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_tasks(&raw)?)
}

pub fn parse_tasks(raw: &str) -> mmi_core::Result<Vec<NewTask>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::validation(format!("Invalid JSON: {}", e)))?;

    let Value::Array(items) = value else {
        return Err(Error::validation(
            "Bulk file must contain a JSON array of task objects.",
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(Error::validation(format!(
                    "Item {} must be an object.",
                    index
                )));
            }
            serde_json::from_value::<NewTask>(item)
                .map_err(|e| Error::validation(format!("Item {}: {}", index, e)))
        })
        .collect()
}
