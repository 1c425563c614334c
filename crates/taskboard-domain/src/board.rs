use serde::{Deserialize, Serialize};

use crate::serde_helpers::null_as_empty;

pub type BoardId = i64;

/// Column set used when a new board is created.
pub const DEFAULT_COLUMNS: [&str; 4] = ["To Do", "In Progress", "Review", "Done"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Ordered column names. These are the only valid task statuses on this board.
    #[serde(default)]
    pub columns: Vec<String>,
}

impl Board {
    pub fn new(id: BoardId, name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            columns,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn first_column(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }

    /// Column to the left (`-1`) or right (`+1`) of `name`, clamped to the board edges.
    pub fn adjacent_column(&self, name: &str, step: isize) -> Option<&str> {
        let index = self.column_index(name)? as isize + step;
        if index < 0 {
            return None;
        }
        self.columns.get(index as usize).map(String::as_str)
    }
}

/// Request body for `POST /api/v1/boards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBoard {
    pub name: String,
    pub description: String,
    pub columns: Vec<String>,
}
