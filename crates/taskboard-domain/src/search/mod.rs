//! Task search.
//!
//! Free-text filtering applied locally to the tasks currently on screen.
//! Shared by the TUI board view and `taskboard task list --query`.

use crate::Task;

/// Trait for matching tasks against a query.
pub trait TaskSearcher {
    /// Returns true if the task matches the search criteria.
    fn matches(&self, task: &Task) -> bool;
}

/// Search tasks by title (case-insensitive).
pub struct TitleSearcher {
    query: String,
}

impl TitleSearcher {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().to_lowercase(),
        }
    }
}

impl TaskSearcher for TitleSearcher {
    fn matches(&self, task: &Task) -> bool {
        task.title.to_lowercase().contains(&self.query)
    }
}

/// Search tasks by description (case-insensitive). Tasks without one never match.
pub struct DescriptionSearcher {
    query: String,
}

impl DescriptionSearcher {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().to_lowercase(),
        }
    }
}

impl TaskSearcher for DescriptionSearcher {
    fn matches(&self, task: &Task) -> bool {
        task.description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&self.query))
    }
}

/// Search tasks by assignee username (case-insensitive).
pub struct AssigneeSearcher {
    query: String,
}

impl AssigneeSearcher {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().to_lowercase(),
        }
    }
}

impl TaskSearcher for AssigneeSearcher {
    fn matches(&self, task: &Task) -> bool {
        task.assigned_to
            .as_deref()
            .is_some_and(|a| a.to_lowercase().contains(&self.query))
    }
}

/// Enum dispatch for searching tasks by a specific field.
pub enum SearchBy {
    Title(TitleSearcher),
    Description(DescriptionSearcher),
    Assignee(AssigneeSearcher),
}

impl SearchBy {
    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Title(s) => s.matches(task),
            Self::Description(s) => s.matches(task),
            Self::Assignee(s) => s.matches(task),
        }
    }
}

/// Matches if any sub-searcher matches. An empty query matches every task.
pub struct CompositeSearcher {
    query_is_empty: bool,
    searchers: Vec<SearchBy>,
}

impl CompositeSearcher {
    /// Title, description, and assignee searchers for one query.
    pub fn all(query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            query_is_empty: query.is_empty(),
            searchers: vec![
                SearchBy::Title(TitleSearcher::new(query.clone())),
                SearchBy::Description(DescriptionSearcher::new(query.clone())),
                SearchBy::Assignee(AssigneeSearcher::new(query)),
            ],
        }
    }
}

impl TaskSearcher for CompositeSearcher {
    fn matches(&self, task: &Task) -> bool {
        self.query_is_empty || self.searchers.iter().any(|s| s.matches(task))
    }
}

/// Tasks matching `query` on title, description, or assignee, in their original order.
pub fn filter_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>, query: &str) -> Vec<&'a Task> {
    let searcher = CompositeSearcher::all(query);
    tasks.into_iter().filter(|t| searcher.matches(t)).collect()
}
