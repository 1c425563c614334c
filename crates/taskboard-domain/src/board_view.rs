//! State of one board's Kanban view.
//!
//! Every user action is a method on [`KanbanBoardState`]. Methods that need
//! the server return what to send (a [`PendingMove`], a [`TaskSubmission`],
//! a task id); the caller performs the request and reports back through the
//! matching `*_succeeded` / `*_failed` method. Local task data is only ever
//! replaced with what the server returned, so a failed move leaves the card
//! where it was.

use taskboard_core::{TaskboardError, TaskboardResult, TextInput};

use crate::board::Board;
use crate::drag::{ColumnRect, DragState, DropOutcome, PendingMove};
use crate::geometry::Point;
use crate::notice::Notice;
use crate::permissions::{authorize, GuardedAction};
use crate::search::{CompositeSearcher, TaskSearcher};
use crate::task::{Task, TaskDraft, TaskId};
use crate::task_form::TaskForm;
use crate::user::{assignable_users, Role, UserSummary};

pub const MOVE_FAILED: &str = "Failed to move task. Please try again.";
pub const SAVE_FAILED: &str = "Failed to save task. Please try again.";
pub const ARCHIVE_FAILED: &str = "Failed to archive task. Please try again.";
pub const ARCHIVE_CONFIRM: &str =
    "Are you sure you want to archive this task? You can restore it later from the archived tasks view.";

/// Validated form contents ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSubmission {
    /// `None` creates a task, `Some(id)` updates one.
    pub editing: Option<TaskId>,
    pub draft: TaskDraft,
}

#[derive(Debug, Clone)]
pub struct KanbanBoardState {
    pub board: Board,
    pub role: Role,
    tasks: Vec<Task>,
    users: Vec<UserSummary>,
    pub query: TextInput,
    pub expanded: Option<TaskId>,
    pub selected_column: usize,
    pub selected_row: usize,
    pub drag: DragState,
    /// Task whose status update is in flight.
    pub moving: Option<TaskId>,
    pub form: Option<TaskForm>,
    pub confirm_archive: Option<TaskId>,
    pub notice: Option<Notice>,
    pub loading: bool,
}

impl KanbanBoardState {
    pub fn new(board: Board, role: Role) -> Self {
        Self {
            board,
            role,
            tasks: Vec::new(),
            users: Vec::new(),
            query: TextInput::new(),
            expanded: None,
            selected_column: 0,
            selected_row: 0,
            drag: DragState::Idle,
            moving: None,
            form: None,
            confirm_archive: None,
            notice: None,
            loading: true,
        }
    }

    pub fn can_edit(&self) -> bool {
        self.role.is_admin()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn users(&self) -> &[UserSummary] {
        &self.users
    }

    /// Replace the board's tasks. Archived tasks never enter the active view.
    pub fn tasks_loaded(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks.into_iter().filter(|task| !task.archived).collect();
        self.loading = false;
        if let Some(id) = self.expanded {
            if self.task(id).is_none() {
                self.expanded = None;
            }
        }
        self.clamp_selection();
    }

    pub fn load_failed(&mut self, err: &TaskboardError) {
        self.loading = false;
        self.notice = Some(Notice::from(err));
    }

    pub fn users_loaded(&mut self, users: Vec<UserSummary>) {
        self.users = assignable_users(users);
    }

    /// Tasks of one column after the search query is applied, in server order.
    pub fn visible_tasks(&self, column: &str) -> Vec<&Task> {
        let searcher = CompositeSearcher::all(self.query.as_str());
        self.tasks
            .iter()
            .filter(|task| task.status == column && searcher.matches(task))
            .collect()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query.set(query);
        self.clamp_selection();
    }

    /// Expand a card, or collapse it if it is already expanded.
    pub fn toggle_expanded(&mut self, id: TaskId) {
        self.expanded = if self.expanded == Some(id) { None } else { Some(id) };
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let column = self.board.columns.get(self.selected_column)?;
        self.visible_tasks(column).get(self.selected_row).copied()
    }

    pub fn select_column(&mut self, step: isize) {
        let count = self.board.columns.len();
        if count == 0 {
            return;
        }
        let next = (self.selected_column as isize + step).clamp(0, count as isize - 1);
        self.selected_column = next as usize;
        self.clamp_selection();
    }

    pub fn select_row(&mut self, step: isize) {
        let len = self.selected_column_len();
        if len == 0 {
            self.selected_row = 0;
            return;
        }
        let next = (self.selected_row as isize + step).clamp(0, len as isize - 1);
        self.selected_row = next as usize;
    }

    pub fn select_task(&mut self, id: TaskId) {
        let position = self.board.columns.iter().enumerate().find_map(|(ci, column)| {
            self.visible_tasks(column)
                .iter()
                .position(|task| task.id == id)
                .map(|ri| (ci, ri))
        });
        if let Some((column, row)) = position {
            self.selected_column = column;
            self.selected_row = row;
        }
    }

    fn selected_column_len(&self) -> usize {
        self.board
            .columns
            .get(self.selected_column)
            .map(|column| self.visible_tasks(column).len())
            .unwrap_or(0)
    }

    fn clamp_selection(&mut self) {
        if self.selected_column >= self.board.columns.len() {
            self.selected_column = self.board.columns.len().saturating_sub(1);
        }
        let len = self.selected_column_len();
        if self.selected_row >= len {
            self.selected_row = len.saturating_sub(1);
        }
    }

    // -- drag and drop --

    pub fn begin_drag(&mut self, id: TaskId) -> TaskboardResult<()> {
        self.guard(GuardedAction::MoveTask)?;
        if self.moving.is_some() {
            return Err(TaskboardError::Validation(
                "A task move is still in progress".to_string(),
            ));
        }
        let task = self
            .task(id)
            .cloned()
            .ok_or_else(|| TaskboardError::NotFound(format!("Task {id}")))?;
        self.drag
            .start(task)
            .map_err(|_| TaskboardError::Validation("A task is already being dragged".to_string()))
    }

    pub fn drag_to(&mut self, rects: &[ColumnRect], point: Point) {
        self.drag.pointer_moved(rects, point);
    }

    /// Keyboard drag: move the hover target one column left or right.
    pub fn drag_step(&mut self, step: isize) {
        let Some(task) = self.drag.dragged() else {
            return;
        };
        let from = self.drag.hovered_column().unwrap_or(&task.status);
        let target = self
            .board
            .adjacent_column(from, step)
            .or_else(|| self.board.column_index(from).map(|_| from))
            .map(String::from);
        if let Some(target) = target {
            self.drag.hover(Some(&target));
        }
    }

    /// Pointer released. Returns the move to send, if any.
    pub fn release(&mut self, rects: &[ColumnRect], point: Point) -> Option<PendingMove> {
        let outcome = self.drag.release_at(rects, point);
        self.finish_drop(outcome)
    }

    /// Drop at the current hover target (keyboard drag).
    pub fn drop_hovered(&mut self) -> Option<PendingMove> {
        let outcome = self.drag.drop_here();
        self.finish_drop(outcome)
    }

    pub fn abandon_drag(&mut self) {
        self.drag.abandon();
    }

    fn finish_drop(&mut self, outcome: DropOutcome) -> Option<PendingMove> {
        match outcome {
            DropOutcome::Commit(pending) => {
                if !self.board.has_column(&pending.to) {
                    return None;
                }
                self.moving = Some(pending.task_id());
                Some(pending)
            }
            DropOutcome::NoOp | DropOutcome::Abandoned => None,
        }
    }

    /// The server accepted the move; adopt its representation of the task.
    pub fn move_succeeded(&mut self, task: Task) {
        self.moving = None;
        self.select_task_after(task.id, |state| state.upsert(task));
    }

    pub fn move_failed(&mut self, err: &TaskboardError) {
        tracing::warn!(error = %err, "Task move rejected");
        self.moving = None;
        self.notice = Some(Notice::error(MOVE_FAILED));
    }

    // -- task form --

    pub fn open_create_form(&mut self, column: &str) -> TaskboardResult<()> {
        self.guard(GuardedAction::CreateTask)?;
        let status = if self.board.has_column(column) {
            column.to_string()
        } else {
            self.board.first_column().unwrap_or_default().to_string()
        };
        self.form = Some(TaskForm::create(&self.board, status));
        Ok(())
    }

    pub fn open_edit_form(&mut self, id: TaskId) -> TaskboardResult<()> {
        self.guard(GuardedAction::EditTask)?;
        let task = self
            .task(id)
            .ok_or_else(|| TaskboardError::NotFound(format!("Task {id}")))?;
        self.form = Some(TaskForm::edit(task));
        Ok(())
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Validate the open form. On failure the field messages stay on the form
    /// and nothing should be sent.
    pub fn submit_form(&mut self) -> TaskboardResult<TaskSubmission> {
        self.guard(GuardedAction::SaveTask)?;
        let form = self
            .form
            .as_mut()
            .ok_or_else(|| TaskboardError::Internal("No task form is open".to_string()))?;
        match form.submit(&self.board, &self.tasks, &self.users) {
            Some(draft) => Ok(TaskSubmission {
                editing: form.editing(),
                draft,
            }),
            None => Err(TaskboardError::InvalidInput(form.errors.clone())),
        }
    }

    pub fn form_saved(&mut self, task: Task) {
        let created = self.form.as_ref().is_some_and(|form| form.editing().is_none());
        self.form = None;
        self.notice = Some(Notice::info(if created {
            "Task created"
        } else {
            "Task updated"
        }));
        self.select_task_after(task.id, |state| state.upsert(task));
    }

    pub fn form_failed(&mut self, err: &TaskboardError) {
        tracing::warn!(error = %err, "Saving task failed");
        if let Some(form) = self.form.as_mut() {
            form.failed();
        }
        self.notice = Some(Notice::error(SAVE_FAILED));
    }

    // -- archive --

    pub fn request_archive(&mut self, id: TaskId) -> TaskboardResult<()> {
        self.guard(GuardedAction::ArchiveTask)?;
        if self.task(id).is_none() {
            return Err(TaskboardError::NotFound(format!("Task {id}")));
        }
        self.confirm_archive = Some(id);
        Ok(())
    }

    /// User confirmed; returns the task to archive.
    pub fn confirm_archive(&mut self) -> Option<TaskId> {
        self.confirm_archive.take()
    }

    pub fn cancel_archive(&mut self) {
        self.confirm_archive = None;
    }

    pub fn task_archived(&mut self, id: TaskId) {
        self.tasks.retain(|task| task.id != id);
        if self.expanded == Some(id) {
            self.expanded = None;
        }
        self.clamp_selection();
        self.notice = Some(Notice::info(
            "Task archived successfully. You can restore it from the archived tasks view.",
        ));
    }

    pub fn archive_failed(&mut self, err: &TaskboardError) {
        tracing::warn!(error = %err, "Archiving task failed");
        self.notice = Some(Notice::error(ARCHIVE_FAILED));
    }

    /// A task restored elsewhere comes back into its column.
    pub fn task_restored(&mut self, task: Task) {
        if task.board_id == self.board.id && !task.archived {
            self.upsert(task);
        }
    }

    fn guard(&mut self, action: GuardedAction) -> TaskboardResult<()> {
        authorize(self.role, action).inspect_err(|err| {
            self.notice = Some(Notice::from(err));
        })
    }

    fn upsert(&mut self, task: Task) {
        if task.board_id != self.board.id {
            tracing::debug!(task_id = task.id, board_id = task.board_id, "Ignoring task from another board");
            return;
        }
        if task.archived {
            self.tasks.retain(|t| t.id != task.id);
            return;
        }
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    fn select_task_after(&mut self, id: TaskId, update: impl FnOnce(&mut Self)) {
        update(self);
        self.select_task(id);
        self.clamp_selection();
    }
}
