use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::{Error, Result};

/// Format of due dates on the command line, in bulk files and in storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                Error::validation(format!(
                    "Invalid priority level: {:?}. Valid values are: {}",
                    s,
                    valid_values(Priority::ALL.iter().map(Priority::as_str))
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
        }
    }

    /// A completed task may be reopened as pending but never resumed as
    /// in progress. Every other move is allowed.
    pub fn can_transition_to(self, next: Status) -> bool {
        !(self == Status::Completed && next == Status::InProgress)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Status::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| {
                Error::validation(format!(
                    "Invalid status: {:?}. Valid values are: {}",
                    s,
                    valid_values(Status::ALL.iter().map(Status::as_str))
                ))
            })
    }
}

fn valid_values<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}

/// Parse a `YYYY-MM-DD` due date.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        Error::validation(format!(
            "Invalid date format: {:?}. Expected YYYY-MM-DD.",
            raw
        ))
    })
}

pub(crate) fn normalize_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(Error::validation("Task title cannot be empty."));
    }
    Ok(title.to_string())
}

fn check_transition(from: Status, to: Status) -> Result<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "Cannot move a task from {} to {}.",
            from, to
        )))
    }
}

/// A unit of trackable work.
///
/// Fields are only reachable through accessors so that every change goes
/// through validation. `id` and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) due_date: Option<NaiveDate>,
    pub(crate) priority: Priority,
    pub(crate) status: Status,
    pub(crate) created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: normalize_title(title.as_ref())?,
            description: String::new(),
            due_date: None,
            priority: Priority::default(),
            status: Status::default(),
            created_at: Utc::now(),
        })
    }

    pub fn with_description(mut self, description: impl AsRef<str>) -> Self {
        self.set_description(description);
        self
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_title(&mut self, title: impl AsRef<str>) -> Result<()> {
        self.title = normalize_title(title.as_ref())?;
        Ok(())
    }

    pub fn set_description(&mut self, description: impl AsRef<str>) {
        self.description = description.as_ref().trim().to_string();
    }

    pub fn set_due_date(&mut self, due_date: Option<NaiveDate>) {
        self.due_date = due_date;
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn set_status(&mut self, status: Status) -> Result<()> {
        check_transition(self.status, status)?;
        self.status = status;
        Ok(())
    }

    pub fn mark_completed(&mut self) {
        self.status = Status::Completed;
    }

    pub fn start(&mut self) -> Result<()> {
        if self.status == Status::Completed {
            return Err(Error::validation(
                "Cannot start a task that is already completed.",
            ));
        }
        self.status = Status::InProgress;
        Ok(())
    }
}

/// The explicitly supplied fields of an update. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

impl TaskUpdate {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }

    /// Check the update against the task it applies to and return it with
    /// text fields trimmed. Nothing is mutated.
    pub fn validate(self, current: &Task) -> Result<Self> {
        let title = self.title.as_deref().map(normalize_title).transpose()?;
        if let Some(status) = self.status {
            check_transition(current.status, status)?;
        }

        Ok(Self {
            title,
            description: self.description.map(|d| d.trim().to_string()),
            ..self
        })
    }
}

/// One entry of a bulk-create request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default, alias = "priority_level")]
    pub priority: Option<Priority>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn into_task(self) -> Result<Task> {
        let task = Task::new(self.title.as_deref().unwrap_or_default())?
            .with_description(self.description.unwrap_or_default())
            .with_due_date(self.due_date)
            .with_priority(self.priority.unwrap_or_default());
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation_defaults() {
        let task = Task::new("Write report").unwrap();

        assert_eq!(task.title(), "Write report");
        assert_eq!(task.description(), "");
        assert_eq!(task.due_date(), None);
        assert_eq!(task.priority(), Priority::Medium);
        assert_eq!(task.status(), Status::Pending);
        assert!(!task.id().is_empty());
    }

    #[test]
    fn test_title_is_trimmed() {
        let task = Task::new("  Ship it \n").unwrap();
        assert_eq!(task.title(), "Ship it");
    }

    #[test]
    fn test_empty_title_rejected() {
        for title in ["", "   ", "\t\n"] {
            let err = Task::new(title).unwrap_err();
            assert!(err.is_validation(), "{:?} should be rejected", title);
        }
    }

    #[test]
    fn test_set_title_rejects_blank_and_keeps_old_value() {
        let mut task = Task::new("Original").unwrap();

        assert!(task.set_title("  ").unwrap_err().is_validation());
        assert_eq!(task.title(), "Original");

        task.set_title(" Renamed ").unwrap();
        assert_eq!(task.title(), "Renamed");
    }

    #[test]
    fn test_description_trimmed_and_may_be_empty() {
        let mut task = Task::new("T").unwrap().with_description("  notes  ");
        assert_eq!(task.description(), "notes");

        task.set_description("   ");
        assert_eq!(task.description(), "");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Task::new("a").unwrap();
        let b = Task::new("b").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_start_and_complete() {
        let mut task = Task::new("T").unwrap();

        task.start().unwrap();
        assert_eq!(task.status(), Status::InProgress);

        task.mark_completed();
        assert_eq!(task.status(), Status::Completed);

        assert!(task.start().unwrap_err().is_validation());
        assert_eq!(task.status(), Status::Completed);
    }

    #[test]
    fn test_set_status_follows_transition_rule() {
        let mut task = Task::new("T").unwrap();
        task.mark_completed();

        assert!(task.set_status(Status::InProgress).is_err());
        task.set_status(Status::Pending).unwrap();
        task.set_status(Status::InProgress).unwrap();
        task.set_status(Status::Completed).unwrap();
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("in_progress".parse::<Status>().unwrap(), Status::InProgress);

        let err = "urgent".parse::<Priority>().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("low, medium, high"));

        assert!("done".parse::<Status>().is_err());
        assert!("HIGH".parse::<Priority>().is_err());
    }

    #[test]
    fn test_parse_due_date() {
        let date = parse_due_date("2025-03-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());

        assert!(parse_due_date("01/03/2025").unwrap_err().is_validation());
        assert!(parse_due_date("2025-02-30").is_err());
    }

    #[test]
    fn test_update_validation() {
        let task = Task::new("T").unwrap();

        let update = TaskUpdate {
            title: Some("  New  ".to_string()),
            description: Some(" d ".to_string()),
            ..Default::default()
        }
        .validate(&task)
        .unwrap();
        assert_eq!(update.title.as_deref(), Some("New"));
        assert_eq!(update.description.as_deref(), Some("d"));

        let blank = TaskUpdate {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(blank.validate(&task).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_cannot_resume_completed_task() {
        let mut task = Task::new("T").unwrap();
        task.mark_completed();

        let err = TaskUpdate::status(Status::InProgress)
            .validate(&task)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(TaskUpdate::status(Status::Pending).validate(&task).is_ok());
    }

    #[test]
    fn test_empty_update() {
        assert!(TaskUpdate::default().is_empty());
        assert!(!TaskUpdate::status(Status::Completed).is_empty());
    }

    #[test]
    fn test_new_task_from_json() {
        let payload: NewTask = serde_json::from_value(serde_json::json!({
            "title": "Buy milk",
            "due_date": "2025-01-31",
            "priority": "high"
        }))
        .unwrap();

        let task = payload.into_task().unwrap();
        assert_eq!(task.title(), "Buy milk");
        assert_eq!(task.priority(), Priority::High);
        assert_eq!(task.due_date(), NaiveDate::from_ymd_opt(2025, 1, 31));

        let bad = serde_json::from_value::<NewTask>(serde_json::json!({
            "title": "x",
            "priority": "urgent"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_new_task_without_title_is_invalid() {
        let err = NewTask::default().into_task().unwrap_err();
        assert!(err.is_validation());
    }
}
