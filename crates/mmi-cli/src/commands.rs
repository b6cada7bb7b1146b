use anyhow::Result;

use crate::bulk;
use crate::cli::Commands;
use crate::output::{print_success, render_task, render_tasks};
use mmi_core::{TaskManager, TaskUpdate};

pub async fn execute(command: Commands, manager: &TaskManager) -> Result<()> {
    match command {
        Commands::Add {
            title,
            description,
            due_date,
            priority,
        } => {
            let task = manager
                .create_task(&title, &description, due_date, priority)
                .await?;

            print_success(&format!("Created task {}: {}", task.id(), task.title()));
        }

        Commands::AddBulk { file } => {
            let payloads = bulk::load_tasks_file(&file)?;
            let created = manager.create_tasks_bulk(payloads).await?;

            if created.is_empty() {
                print_success("No tasks created (input file was empty).");
            } else {
                print_success(&format!("Created {} tasks in bulk.", created.len()));
            }
        }

        Commands::List {
            status,
            priority,
            due_date,
        } => {
            let tasks = manager.list_tasks(status, priority, due_date).await?;
            println!("{}", render_tasks(&tasks));
        }

        Commands::Show { id } => {
            let task = manager.get_task(&id).await?;
            println!("{}", render_task(&task));
        }

        Commands::Update {
            id,
            title,
            description,
            due_date,
            priority,
            status,
        } => {
            let changes = TaskUpdate {
                title,
                description,
                due_date,
                priority,
                status,
            };
            let task = manager.update_task(&id, changes).await?;

            print_success(&format!("Updated task {}: {}", task.id(), task.title()));
        }

        Commands::Complete { id } => {
            let task = manager.complete_task(&id).await?;
            print_success(&format!("Marked task {} as completed.", task.id()));
        }

        Commands::Delete { id } => {
            manager.delete_task(&id).await?;
            print_success(&format!("Deleted task {}.", id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmi_core::{MemoryCollection, Priority, Status, TaskStore};
    use std::sync::Arc;

    fn manager() -> TaskManager {
        TaskManager::new(TaskStore::new(Arc::new(MemoryCollection::new())))
    }

    #[tokio::test]
    async fn test_add_then_complete() {
        let manager = manager();
        execute(
            Commands::Add {
                title: "From the command line".to_string(),
                description: String::new(),
                due_date: None,
                priority: Priority::Low,
            },
            &manager,
        )
        .await
        .unwrap();

        let tasks = manager.list_tasks(None, None, None).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority(), Priority::Low);

        execute(
            Commands::Complete {
                id: tasks[0].id().to_string(),
            },
            &manager,
        )
        .await
        .unwrap();

        let done = manager
            .list_tasks(Some(Status::Completed), None, None)
            .await
            .unwrap();
        assert_eq!(done.len(), 1);
    }

    #[tokio::test]
    async fn test_errors_keep_their_kind() {
        let manager = manager();
        let err = execute(Commands::Delete { id: "nope".to_string() }, &manager)
            .await
            .unwrap_err();

        let core = err.downcast_ref::<mmi_core::Error>().unwrap();
        assert!(core.is_not_found());
    }

    #[tokio::test]
    async fn test_blank_update_title_rejected() {
        let manager = manager();
        let task = manager
            .create_task("Stable", "", None, Priority::Medium)
            .await
            .unwrap();

        let err = execute(
            Commands::Update {
                id: task.id().to_string(),
                title: Some("   ".to_string()),
                description: None,
                due_date: None,
                priority: None,
                status: None,
            },
            &manager,
        )
        .await
        .unwrap_err();

        assert!(err.downcast_ref::<mmi_core::Error>().unwrap().is_validation());
        assert_eq!(manager.get_task(task.id()).await.unwrap().title(), "Stable");
    }
}
