use chrono::NaiveDate;

use crate::store::TaskStore;
use crate::task::{NewTask, Priority, Status, Task, TaskUpdate};
use crate::{Error, Result};

/// Entry point for every task operation. Validates input before touching
/// storage and turns storage outcomes into [`Error`] kinds.
#[derive(Clone)]
pub struct TaskManager {
    store: TaskStore,
}

impl TaskManager {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// Create and persist a new task
    pub async fn create_task(
        &self,
        title: &str,
        description: &str,
        due_date: Option<NaiveDate>,
        priority: Priority,
    ) -> Result<Task> {
        let task = Task::new(title)?
            .with_description(description)
            .with_due_date(due_date)
            .with_priority(priority);

        let task = self
            .store
            .create(task)
            .await
            .map_err(|e| Error::persistence("Failed to create task", e))?;

        tracing::info!("Created task: {} ({})", task.title(), task.id());
        Ok(task)
    }

    /// Create many tasks with a single bulk insert.
    ///
    /// Every payload is validated first; one bad entry rejects the whole
    /// batch and nothing is written.
    pub async fn create_tasks_bulk(&self, payloads: Vec<NewTask>) -> Result<Vec<Task>> {
        let tasks = payloads
            .into_iter()
            .enumerate()
            .map(|(index, payload)| {
                payload.into_task().map_err(|e| {
                    Error::validation(format!("Invalid task at index {}: {}", index, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let tasks = self
            .store
            .create_bulk(tasks)
            .await
            .map_err(|e| Error::persistence("Failed to bulk-create tasks", e))?;

        tracing::info!("Bulk-created {} tasks", tasks.len());
        Ok(tasks)
    }

    /// Get task by ID
    pub async fn get_task(&self, task_id: &str) -> Result<Task> {
        self.store
            .get(task_id)
            .await
            .map_err(|e| Error::persistence(format!("Failed to fetch task {:?}", task_id), e))?
            .ok_or_else(|| Error::not_found(task_id))
    }

    /// List tasks, oldest first, optionally filtered
    pub async fn list_tasks(
        &self,
        status: Option<Status>,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
    ) -> Result<Vec<Task>> {
        self.store
            .list(status, priority, due_date)
            .await
            .map_err(|e| Error::persistence("Failed to list tasks", e))
    }

    /// Apply the supplied fields to an existing task
    pub async fn update_task(&self, task_id: &str, changes: TaskUpdate) -> Result<Task> {
        let current = self.get_task(task_id).await?;
        let changes = changes.validate(&current)?;

        let updated = self
            .store
            .update(task_id, &changes)
            .await
            .map_err(|e| Error::persistence(format!("Failed to update task {:?}", task_id), e))?
            .ok_or_else(|| vanished(task_id))?;

        tracing::info!("Updated task: {} ({})", updated.title(), task_id);
        Ok(updated)
    }

    /// Mark a task as completed
    pub async fn complete_task(&self, task_id: &str) -> Result<Task> {
        let updated = self
            .store
            .update(task_id, &TaskUpdate::status(Status::Completed))
            .await
            .map_err(|e| {
                Error::persistence(
                    format!("Failed to mark task {:?} as completed", task_id),
                    e,
                )
            })?
            .ok_or_else(|| vanished(task_id))?;

        tracing::info!("Task completed: {} ({})", updated.title(), task_id);
        Ok(updated)
    }

    /// Delete a task
    pub async fn delete_task(&self, task_id: &str) -> Result<()> {
        let deleted = self
            .store
            .delete(task_id)
            .await
            .map_err(|e| Error::persistence(format!("Failed to delete task {:?}", task_id), e))?;

        if !deleted {
            return Err(Error::not_found(task_id));
        }

        tracing::info!("Deleted task {}", task_id);
        Ok(())
    }
}

fn vanished(task_id: &str) -> Error {
    Error::NotFound(format!("Task {:?} no longer exists.", task_id))
}
