use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskError};

/// Date format accepted on the command line and written to the task file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Importance of a task. Ordered `Low < Medium < High`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Marker shown next to the priority label; high gets the doubled marker.
    pub fn marker(self) -> &'static str {
        match self {
            Priority::Low => "◇",
            Priority::Medium => "◆",
            Priority::High => "◆◆",
        }
    }

    pub fn label(self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                TaskError::validation("priority", format!("'{}' is not one of: low, medium, high", s))
            })
    }
}

/// Represents a single task in the task list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier, never reassigned while the task exists.
    pub id: u64,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
    /// When the task was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Local>>,
    /// When the task was marked complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Local>>,
}

/// Unvalidated input for a new task, as it arrives from the command line.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub description: String,
    pub due: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
}

impl NewTask {
    pub fn new(description: impl Into<String>) -> Self {
        NewTask { description: description.into(), ..Default::default() }
    }

    pub fn due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Checks every field and builds the task under the given id.
    pub fn into_task(self, id: u64, created_at: DateTime<Local>) -> Result<Task> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(TaskError::validation("description", "task description cannot be empty"));
        }
        let due_date = self.due.as_deref().map(parse_due_date).transpose()?;
        let priority = match self.priority.as_deref() {
            Some(p) => p.parse()?,
            None => Priority::default(),
        };

        Ok(Task {
            id,
            description: description.to_string(),
            completed: false,
            priority,
            due_date,
            category: normalize_category(self.category),
            created_at: Some(created_at),
            completed_at: None,
        })
    }
}

/// Parses a `YYYY-MM-DD` due date.
pub fn parse_due_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|e| {
        TaskError::validation("due date", format!("'{}' ({}). Use YYYY-MM-DD", s, e))
    })
}

/// Trims a category; blank categories count as none.
pub fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
