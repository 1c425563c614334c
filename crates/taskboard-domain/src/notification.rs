use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde_helpers::{null_as_empty, optional_timestamp};

pub type NotificationId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    TaskCreated,
    TaskUpdated,
    TaskAssigned,
    TaskDeleted,
    /// A type this client does not know; shown verbatim.
    Other(String),
}

impl NotificationKind {
    pub fn label(&self) -> &str {
        match self {
            Self::TaskCreated => "Created",
            Self::TaskUpdated => "Updated",
            Self::TaskAssigned => "Assigned",
            Self::TaskDeleted => "Deleted",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for NotificationKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "TASK_CREATED" => Self::TaskCreated,
            "TASK_UPDATED" => Self::TaskUpdated,
            "TASK_ASSIGNED" => Self::TaskAssigned,
            "TASK_DELETED" => Self::TaskDeleted,
            _ => Self::Other(raw),
        }
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::TaskCreated => "TASK_CREATED".to_string(),
            NotificationKind::TaskUpdated => "TASK_UPDATED".to_string(),
            NotificationKind::TaskAssigned => "TASK_ASSIGNED".to_string(),
            NotificationKind::TaskDeleted => "TASK_DELETED".to_string(),
            NotificationKind::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Compact age of a notification: `Just now`, `5m ago`, `3h ago`, `2d ago`.
pub fn format_relative(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created_at) = created_at else {
        return String::new();
    };
    let diff = now.signed_duration_since(created_at);
    let minutes = diff.num_minutes();
    if diff.num_seconds() < 60 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if diff.num_hours() < 24 {
        format!("{}h ago", diff.num_hours())
    } else {
        format!("{}d ago", diff.num_days())
    }
}
