//! Kanban board requests.

use futures::join;
use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::{
    Board, BoardId, BoardStats, ColumnRect, KanbanBoardState, PendingMove, Point, Task, TaskDraft,
    TaskId, TaskSubmission, UserSummary,
};

use super::resolve_role;
use crate::api::Services;

/// Non-archived tasks of a board.
pub async fn fetch_tasks(services: &Services, board_id: BoardId) -> TaskboardResult<Vec<Task>> {
    let tasks = services.tasks.board_tasks(board_id, true).await?;
    Ok(tasks.into_iter().filter(|task| !task.archived).collect())
}

/// The user directory. Non-admins are refused by the server; that yields an empty list.
pub async fn fetch_users(services: &Services) -> Vec<UserSummary> {
    match services.users.list_users().await {
        Ok(users) => users,
        Err(err) => {
            tracing::warn!(error = %err, "User list unavailable");
            Vec::new()
        }
    }
}

/// Send a drop as a status update built from the task as it was when picked up.
pub async fn send_move(services: &Services, pending: &PendingMove) -> TaskboardResult<Task> {
    tracing::info!(
        task_id = pending.task_id(),
        from = %pending.from,
        to = %pending.to,
        "Moving task"
    );
    let draft = TaskDraft::from(&pending.task).with_status(pending.to.clone());
    services.tasks.update_task(pending.task_id(), &draft).await
}

pub async fn save_task(services: &Services, submission: &TaskSubmission) -> TaskboardResult<Task> {
    match submission.editing {
        Some(id) => services.tasks.update_task(id, &submission.draft).await,
        None => services.tasks.create_task(&submission.draft).await,
    }
}

pub async fn archive_task(services: &Services, id: TaskId) -> TaskboardResult<()> {
    services.tasks.archive_task(id).await
}

pub struct KanbanController {
    services: Services,
    pub state: KanbanBoardState,
}

impl KanbanController {
    /// Resolve the caller's role, then load tasks and assignable users.
    pub async fn open(services: Services, board: Board, token: Option<&str>) -> Self {
        let role = resolve_role(&services, token).await;
        let mut controller = Self {
            state: KanbanBoardState::new(board, role),
            services,
        };
        if let Err(err) = controller.reload().await {
            tracing::warn!(board_id = controller.state.board.id, error = %err, "Board load failed");
        }
        controller
    }

    pub async fn reload(&mut self) -> TaskboardResult<()> {
        let (tasks, users) = join!(
            fetch_tasks(&self.services, self.state.board.id),
            fetch_users(&self.services)
        );
        self.state.users_loaded(users);
        match tasks {
            Ok(tasks) => {
                self.state.tasks_loaded(tasks);
                Ok(())
            }
            Err(err) => {
                self.state.load_failed(&err);
                Err(err)
            }
        }
    }

    pub fn stats(&self) -> BoardStats {
        BoardStats::from_tasks(self.state.tasks())
    }

    /// Drag a task onto `column` and drop it there. `Ok(None)` means nothing
    /// had to be sent because the task is already in that column.
    pub async fn move_task(&mut self, id: TaskId, column: &str) -> TaskboardResult<Option<Task>> {
        if !self.state.board.has_column(column) {
            return Err(TaskboardError::Validation(format!(
                "\"{column}\" is not a column of board \"{}\"",
                self.state.board.name
            )));
        }
        self.state.begin_drag(id)?;
        self.state.drag.hover(Some(column));
        match self.state.drop_hovered() {
            Some(pending) => self.commit_move(pending).await.map(Some),
            None => Ok(None),
        }
    }

    /// Pointer released over the board.
    pub async fn release(&mut self, rects: &[ColumnRect], point: Point) -> TaskboardResult<Option<Task>> {
        match self.state.release(rects, point) {
            Some(pending) => self.commit_move(pending).await.map(Some),
            None => Ok(None),
        }
    }

    async fn commit_move(&mut self, pending: PendingMove) -> TaskboardResult<Task> {
        match send_move(&self.services, &pending).await {
            Ok(task) => {
                self.state.move_succeeded(task.clone());
                Ok(task)
            }
            Err(err) => {
                self.state.move_failed(&err);
                Err(err)
            }
        }
    }

    /// Validate the open form and send it. Invalid forms send nothing.
    pub async fn submit_form(&mut self) -> TaskboardResult<Task> {
        let submission = self.state.submit_form()?;
        match save_task(&self.services, &submission).await {
            Ok(task) => {
                tracing::info!(task_id = task.id, "Saved task");
                self.state.form_saved(task.clone());
                Ok(task)
            }
            Err(err) => {
                self.state.form_failed(&err);
                Err(err)
            }
        }
    }

    /// Archive the task awaiting confirmation, if any.
    pub async fn archive_confirmed(&mut self) -> TaskboardResult<Option<TaskId>> {
        let Some(id) = self.state.confirm_archive() else {
            return Ok(None);
        };
        match archive_task(&self.services, id).await {
            Ok(()) => {
                self.state.task_archived(id);
                Ok(Some(id))
            }
            Err(err) => {
                self.state.archive_failed(&err);
                Err(err)
            }
        }
    }
}
