use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::board::BoardId;
use crate::serde_helpers::{blank_as_none, optional_timestamp};

pub type TaskId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
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
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("Unknown priority: {other} (expected Low, Medium, or High)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    /// Name of the owning board's column this task sits in.
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub assigned_to: Option<String>,
    pub board_id: BoardId,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: TaskId, board_id: BoardId, title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            status: status.into(),
            priority: Priority::Medium,
            assigned_to: None,
            board_id,
            archived: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Tasks in a `Done` or `Completed` column count towards completion.
    pub fn is_completed(&self) -> bool {
        let status = self.status.trim();
        status.eq_ignore_ascii_case("done") || status.eq_ignore_ascii_case("completed")
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Request body for task create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: Priority,
    pub assigned_to: String,
    pub board_id: BoardId,
}

impl TaskDraft {
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status.clone(),
            priority: task.priority,
            assigned_to: task.assigned_to.clone().unwrap_or_default(),
            board_id: task.board_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_round_trips_as_capitalized_word() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"High\"");
        assert_eq!("medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_deserialize_wire_task_with_blank_assignee() {
        let json = r#"{
            "id": 3,
            "title": "Fix bug",
            "description": "",
            "status": "To Do",
            "priority": "High",
            "assignedTo": "",
            "boardId": 1,
            "archived": false,
            "createdAt": "2024-05-01T09:00:00",
            "updatedAt": null
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.assigned_to, None);
        assert_eq!(task.description, None);
        assert_eq!(task.priority, Priority::High);
        assert!(task.created_at.is_some());
        assert!(task.updated_at.is_none());
    }

    #[test]
    fn test_missing_priority_defaults_to_medium() {
        let json = r#"{"id":1,"title":"t","status":"Done","boardId":2}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.archived);
    }

    #[test]
    fn test_is_completed() {
        let mut task = Task::new(1, 1, "t", "Done");
        assert!(task.is_completed());
        task.status = "completed".into();
        assert!(task.is_completed());
        task.status = "Doing".into();
        assert!(!task.is_completed());
    }

    #[test]
    fn test_draft_uses_camel_case_and_empty_strings() {
        let mut task = Task::new(5, 9, "Write docs", "To Do");
        task.priority = Priority::Low;
        let draft = TaskDraft::from(&task).with_status("Done");
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["status"], "Done");
        assert_eq!(value["boardId"], 9);
        assert_eq!(value["assignedTo"], "");
        assert_eq!(value["priority"], "Low");
    }
}
