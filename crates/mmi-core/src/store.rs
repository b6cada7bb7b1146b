use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;

use crate::collection::{Collection, CollectionError};
use crate::document::{Filter, Sort, Update};
use crate::mapping::{self, CREATED_AT, DESCRIPTION, DUE_DATE, PRIORITY_LEVEL, STATUS, TITLE};
use crate::task::{Priority, Status, Task, TaskUpdate};

/// CRUD and filtered queries for tasks on top of a [`Collection`].
#[derive(Clone)]
pub struct TaskStore {
    collection: Arc<dyn Collection>,
}

impl TaskStore {
    pub fn new(collection: Arc<dyn Collection>) -> Self {
        Self { collection }
    }

    /// Insert a task
    pub async fn create(&self, task: Task) -> Result<Task, CollectionError> {
        self.collection
            .insert_one(mapping::to_document(&task))
            .await?;

        tracing::debug!("Inserted task {}", task.id());
        Ok(task)
    }

    /// Insert many tasks with one unordered bulk write
    pub async fn create_bulk(&self, tasks: Vec<Task>) -> Result<Vec<Task>, CollectionError> {
        if tasks.is_empty() {
            return Ok(tasks);
        }

        let documents = tasks.iter().map(mapping::to_document).collect();
        let inserted = self.collection.insert_many(documents).await?;

        tracing::debug!("Bulk-inserted {} tasks", inserted);
        Ok(tasks)
    }

    /// Get task by ID
    pub async fn get(&self, task_id: &str) -> Result<Option<Task>, CollectionError> {
        self.collection
            .find_one(&Filter::by_id(task_id))
            .await?
            .map(|document| mapping::from_document(&document))
            .transpose()
    }

    /// Tasks matching every supplied criterion, oldest first
    pub async fn list(
        &self,
        status: Option<Status>,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
    ) -> Result<Vec<Task>, CollectionError> {
        let mut filter = Filter::new();
        if let Some(status) = status {
            filter = filter.eq(STATUS, status.as_str());
        }
        if let Some(priority) = priority {
            filter = filter.eq(PRIORITY_LEVEL, priority.as_str());
        }
        if let Some(due_date) = due_date {
            filter = filter.eq(DUE_DATE, mapping::date_value(Some(due_date)));
        }

        let documents = self
            .collection
            .find(&filter, Some(&Sort::ascending(CREATED_AT)))
            .await?;

        documents.iter().map(mapping::from_document).collect()
    }

    /// Set the supplied fields and return the updated task, or `None` if no
    /// task has this id. An empty update only reads.
    pub async fn update(
        &self,
        task_id: &str,
        changes: &TaskUpdate,
    ) -> Result<Option<Task>, CollectionError> {
        if changes.is_empty() {
            return self.get(task_id).await;
        }

        let update = to_update(changes);
        let updated = self
            .collection
            .find_one_and_update(&Filter::by_id(task_id), &update)
            .await?;

        updated
            .map(|document| mapping::from_document(&document))
            .transpose()
    }

    /// Delete task by ID, returning whether anything was removed
    pub async fn delete(&self, task_id: &str) -> Result<bool, CollectionError> {
        let deleted = self.collection.delete_one(&Filter::by_id(task_id)).await?;
        Ok(deleted > 0)
    }
}

fn to_update(changes: &TaskUpdate) -> Update {
    let mut update = Update::new();
    if let Some(title) = &changes.title {
        update = update.set(TITLE, title.as_str());
    }
    if let Some(description) = &changes.description {
        update = update.set(DESCRIPTION, description.as_str());
    }
    if let Some(due_date) = changes.due_date {
        update = update.set(DUE_DATE, mapping::date_value(Some(due_date)));
    }
    if let Some(priority) = changes.priority {
        update = update.set(PRIORITY_LEVEL, Value::from(priority.as_str()));
    }
    if let Some(status) = changes.status {
        update = update.set(STATUS, Value::from(status.as_str()));
    }
    update
}
