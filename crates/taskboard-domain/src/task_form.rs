//! Create/edit task form state and validation.

use taskboard_core::{normalize_name, word_count, FieldErrors, FormField, TextInput};

use crate::board::Board;
use crate::task::{Priority, Task, TaskDraft, TaskId};
use crate::user::UserSummary;

pub const MAX_TITLE_WORDS: usize = 100;
pub const MAX_DESCRIPTION_WORDS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFormMode {
    Create,
    Edit(TaskId),
}

/// Field that currently receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFormFocus {
    #[default]
    Title,
    Description,
    Priority,
    AssignedTo,
}

impl TaskFormFocus {
    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Priority,
            Self::Priority => Self::AssignedTo,
            Self::AssignedTo => Self::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Title => Self::AssignedTo,
            Self::Description => Self::Title,
            Self::Priority => Self::Description,
            Self::AssignedTo => Self::Priority,
        }
    }
}

/// Check a draft against the board it belongs to.
///
/// `tasks` are the board's tasks as currently loaded; archived ones are
/// ignored for the duplicate-title rule, as is the task being edited.
/// `users` is the fetched user directory. Every failing field is reported.
pub fn validate_task(
    draft: &TaskDraft,
    editing: Option<TaskId>,
    board: &Board,
    tasks: &[Task],
    users: &[UserSummary],
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = draft.title.trim();
    if title.is_empty() {
        errors.add(FormField::Title, "Task title is required");
    } else if word_count(title) > MAX_TITLE_WORDS {
        errors.add(FormField::Title, "Title must be 100 words or less");
    } else {
        let wanted = normalize_name(title);
        let duplicate = tasks.iter().any(|task| {
            !task.archived && Some(task.id) != editing && normalize_name(&task.title) == wanted
        });
        if duplicate {
            errors.add(FormField::Title, "A task with this title already exists");
        }
    }

    if word_count(&draft.description) > MAX_DESCRIPTION_WORDS {
        errors.add(
            FormField::Description,
            "Description must be 1000 words or less",
        );
    }

    let assignee = draft.assigned_to.trim();
    if !assignee.is_empty()
        && !users
            .iter()
            .any(|user| !user.role.is_admin() && user.username == assignee)
    {
        errors.add(
            FormField::AssignedTo,
            "Assignee must be an existing non-admin user",
        );
    }

    if !board.has_column(&draft.status) {
        errors.add(FormField::Status, "Status must be one of the board's columns");
    }

    errors.into_result()
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    pub mode: TaskFormMode,
    pub board_id: i64,
    pub title: TextInput,
    pub description: TextInput,
    pub priority: Priority,
    pub assigned_to: Option<String>,
    /// Column the task is created in, or its current column when editing.
    pub status: String,
    pub focus: TaskFormFocus,
    pub errors: FieldErrors,
    pub submitting: bool,
}

impl TaskForm {
    pub fn create(board: &Board, status: impl Into<String>) -> Self {
        Self {
            mode: TaskFormMode::Create,
            board_id: board.id,
            title: TextInput::new(),
            description: TextInput::multiline(),
            priority: Priority::default(),
            assigned_to: None,
            status: status.into(),
            focus: TaskFormFocus::default(),
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    pub fn edit(task: &Task) -> Self {
        let mut description = TextInput::multiline();
        description.set(task.description_text());
        Self {
            mode: TaskFormMode::Edit(task.id),
            board_id: task.board_id,
            title: TextInput::with_text(task.title.clone()),
            description,
            priority: task.priority,
            assigned_to: task.assigned_to.clone(),
            status: task.status.clone(),
            focus: TaskFormFocus::default(),
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    pub fn editing(&self) -> Option<TaskId> {
        match self.mode {
            TaskFormMode::Create => None,
            TaskFormMode::Edit(id) => Some(id),
        }
    }

    pub fn draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.as_str().trim().to_string(),
            description: self.description.as_str().trim().to_string(),
            status: self.status.clone(),
            priority: self.priority,
            assigned_to: self.assigned_to.clone().unwrap_or_default(),
            board_id: self.board_id,
        }
    }

    /// Validate and, on success, return the request body. Errors are kept on the form.
    pub fn submit(&mut self, board: &Board, tasks: &[Task], users: &[UserSummary]) -> Option<TaskDraft> {
        let draft = self.draft();
        match validate_task(&draft, self.editing(), board, tasks, users) {
            Ok(()) => {
                self.errors = FieldErrors::new();
                self.submitting = true;
                Some(draft)
            }
            Err(errors) => {
                tracing::debug!(count = errors.len(), "Task form rejected");
                self.errors = errors;
                None
            }
        }
    }

    pub fn cycle_priority(&mut self) {
        self.priority = self.priority.next();
        self.errors.clear(FormField::Priority);
    }

    /// Step through `Unassigned` then each assignable user.
    pub fn cycle_assignee(&mut self, users: &[UserSummary]) {
        let candidates: Vec<&str> = users
            .iter()
            .filter(|user| !user.role.is_admin())
            .map(|user| user.username.as_str())
            .collect();
        let next = match self.assigned_to.as_deref() {
            None => candidates.first().copied(),
            Some(current) => candidates
                .iter()
                .position(|name| *name == current)
                .and_then(|index| candidates.get(index + 1).copied()),
        };
        self.assigned_to = next.map(String::from);
        self.errors.clear(FormField::AssignedTo);
    }

    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            TaskFormFocus::Title => Some(&mut self.title),
            TaskFormFocus::Description => Some(&mut self.description),
            TaskFormFocus::Priority | TaskFormFocus::AssignedTo => None,
        }
    }

    pub fn failed(&mut self) {
        self.submitting = false;
    }
}
