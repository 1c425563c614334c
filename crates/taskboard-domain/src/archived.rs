use taskboard_core::{TaskboardError, TaskboardResult};

use crate::board::BoardId;
use crate::notice::Notice;
use crate::permissions::{authorize, GuardedAction};
use crate::task::{Task, TaskId};
use crate::user::Role;

pub const RESTORED: &str = "Task restored successfully!";
pub const RESTORE_FAILED: &str = "Failed to restore task";

/// Which archived tasks are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveScope {
    Board(BoardId),
    All,
}

impl ArchiveScope {
    pub fn includes(&self, task: &Task) -> bool {
        match self {
            Self::Board(id) => task.board_id == *id,
            Self::All => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArchivedTasksState {
    pub scope: ArchiveScope,
    role: Role,
    tasks: Vec<Task>,
    pub selected: usize,
    /// Task whose restore request is in flight.
    pub restoring: Option<TaskId>,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl ArchivedTasksState {
    pub fn open(role: Role, scope: ArchiveScope) -> TaskboardResult<Self> {
        authorize(role, GuardedAction::ViewArchived)?;
        Ok(Self {
            scope,
            role,
            tasks: Vec::new(),
            selected: 0,
            restoring: None,
            loading: true,
            notice: None,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The server returns every archived task, with or without the flag set;
    /// keep those in scope.
    pub fn loaded(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks
            .into_iter()
            .filter(|task| self.scope.includes(task))
            .map(|mut task| {
                task.archived = true;
                task
            })
            .collect();
        self.loading = false;
        self.selected = self.selected.min(self.tasks.len().saturating_sub(1));
    }

    pub fn load_failed(&mut self, err: &TaskboardError) {
        self.loading = false;
        self.notice = Some(Notice::from(err));
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    pub fn select(&mut self, step: isize) {
        if self.tasks.is_empty() {
            return;
        }
        let next = (self.selected as isize + step).clamp(0, self.tasks.len() as isize - 1);
        self.selected = next as usize;
    }

    pub fn request_restore(&mut self, id: TaskId) -> TaskboardResult<TaskId> {
        if let Err(err) = authorize(self.role, GuardedAction::RestoreTask) {
            self.notice = Some(Notice::from(&err));
            return Err(err);
        }
        if !self.tasks.iter().any(|task| task.id == id) {
            return Err(TaskboardError::NotFound(format!("Archived task {id}")));
        }
        self.restoring = Some(id);
        Ok(id)
    }

    /// Drop the restored task locally; the caller re-fetches the list.
    pub fn restored(&mut self, id: TaskId) {
        self.tasks.retain(|task| task.id != id);
        self.restoring = None;
        self.selected = self.selected.min(self.tasks.len().saturating_sub(1));
        self.notice = Some(Notice::info(RESTORED));
    }

    pub fn restore_failed(&mut self, err: &TaskboardError) {
        tracing::warn!(error = %err, "Restoring task failed");
        self.restoring = None;
        self.notice = Some(Notice::error(RESTORE_FAILED));
    }
}
