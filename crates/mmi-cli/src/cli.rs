use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mmi_core::{parse_due_date, Priority, Status};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mmi")]
#[command(about = "CLI Task Manager", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database URL
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Settings file (defaults to ./mmi.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Short title for the task
        title: String,

        /// Longer description of the task
        #[arg(short, long, default_value = "")]
        description: String,

        /// Optional due date
        #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_due_date)]
        due_date: Option<NaiveDate>,

        /// Priority level (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },

    /// Bulk-create tasks from a JSON file
    ///
    /// The file holds an array of objects with the fields title,
    /// description, due_date and priority.
    AddBulk {
        /// Path to a JSON file with an array of task definitions
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List tasks, oldest first
    List {
        /// Filter by status (pending, in_progress, completed)
        #[arg(long)]
        status: Option<Status>,

        /// Filter by priority level (low, medium, high)
        #[arg(long)]
        priority: Option<Priority>,

        /// Filter by exact due date
        #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_due_date)]
        due_date: Option<NaiveDate>,
    },

    /// Show a single task
    Show {
        /// Task ID
        id: String,
    },

    /// Update title, description, due date, priority or status of a task
    Update {
        /// Task ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New due date
        #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_due_date)]
        due_date: Option<NaiveDate>,

        /// New priority level (low, medium, high)
        #[arg(short, long)]
        priority: Option<Priority>,

        /// New status (pending, in_progress, completed)
        #[arg(long)]
        status: Option<Status>,
    },

    /// Mark a task as completed
    Complete {
        /// Task ID
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("mmi").chain(args.iter().copied()))
    }

    #[test]
    fn test_add_defaults() {
        let cli = parse(&["add", "Write report"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Add {
                title: "Write report".to_string(),
                description: String::new(),
                due_date: None,
                priority: Priority::Medium,
            }
        );
    }

    #[test]
    fn test_add_with_options() {
        let cli = parse(&[
            "add",
            "Ship",
            "-d",
            "release 1.0",
            "--due-date",
            "2025-04-01",
            "-p",
            "high",
        ])
        .unwrap();

        match cli.command {
            Commands::Add {
                due_date, priority, ..
            } => {
                assert_eq!(due_date, NaiveDate::from_ymd_opt(2025, 4, 1));
                assert_eq!(priority, Priority::High);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_invalid_values_rejected_at_parse_time() {
        assert!(parse(&["add", "x", "-p", "urgent"]).is_err());
        assert!(parse(&["add", "x", "--due-date", "tomorrow"]).is_err());
        assert!(parse(&["list", "--status", "done"]).is_err());
    }

    #[test]
    fn test_update_flags() {
        let cli = parse(&["update", "abc", "--status", "in_progress"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Update {
                id: "abc".to_string(),
                title: None,
                description: None,
                due_date: None,
                priority: None,
                status: Some(Status::InProgress),
            }
        );
    }

    #[test]
    fn test_add_bulk_requires_file() {
        assert!(parse(&["add-bulk"]).is_err());
        let cli = parse(&["add-bulk", "-f", "tasks.json"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::AddBulk {
                file: PathBuf::from("tasks.json")
            }
        );
    }
}
