//! A backend that keeps everything in memory.
//!
//! Implements every service trait with the server's observable behaviour
//! (status checks, soft deletes, conflicts) and records each request it
//! receives as `"METHOD path"`, so tests can assert on what was sent.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use taskboard_core::{normalize_name, TaskboardError, TaskboardResult};
use taskboard_domain::{
    Board, BoardId, Credentials, ForgotPassword, NewBoard, Notification, NotificationId,
    NotificationKind, PasswordReset, Profile, Registration, Role, Task, TaskDraft, TaskId,
    UserSummary,
};

use crate::api::{AuthApi, BoardApi, LoginResponse, NotificationApi, TaskApi, UserApi};

#[derive(Debug, Clone)]
struct Account {
    username: String,
    email: String,
    password: String,
    role: Role,
}

#[derive(Debug, Default)]
struct Store {
    boards: Vec<Board>,
    tasks: Vec<Task>,
    notifications: Vec<Notification>,
    accounts: Vec<Account>,
    reset_tokens: Vec<(String, String)>,
    signed_in: Option<String>,
    next_id: i64,
    requests: Vec<String>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, request: String) {
        tracing::debug!(%request, "In-memory request");
        self.requests.push(request);
    }

    fn board(&self, id: BoardId) -> TaskboardResult<&Board> {
        self.boards
            .iter()
            .find(|board| board.id == id)
            .ok_or_else(|| TaskboardError::http(404, "Board not found"))
    }

    fn task_mut(&mut self, id: TaskId) -> TaskboardResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| TaskboardError::http(404, "Task not found"))
    }

    fn check_status(&self, draft: &TaskDraft) -> TaskboardResult<()> {
        if self.board(draft.board_id)?.has_column(&draft.status) {
            Ok(())
        } else {
            Err(TaskboardError::http(
                400,
                format!("Invalid status: {}", draft.status),
            ))
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBackend {
    store: Mutex<Store>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn seed_board(&self, name: &str, columns: &[&str]) -> Board {
        let mut store = self.lock();
        let id = store.next_id();
        let board = Board::new(id, name, columns.iter().map(|c| c.to_string()).collect());
        store.boards.push(board.clone());
        board
    }

    pub fn seed_task(&self, board_id: BoardId, title: &str, status: &str) -> Task {
        let mut store = self.lock();
        let id = store.next_id();
        let mut task = Task::new(id, board_id, title, status);
        task.created_at = Some(Utc::now());
        task.updated_at = task.created_at;
        store.tasks.push(task.clone());
        task
    }

    pub fn seed_account(&self, username: &str, email: &str, password: &str, role: Role) {
        self.lock().accounts.push(Account {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
        });
    }

    pub fn seed_notification(
        &self,
        kind: NotificationKind,
        message: &str,
        read: bool,
        created_at: Option<DateTime<Utc>>,
    ) -> Notification {
        let mut store = self.lock();
        let notification = Notification {
            id: store.next_id(),
            kind,
            message: message.to_string(),
            read,
            created_at,
        };
        store.notifications.push(notification.clone());
        notification
    }

    /// Treat `username` as the caller of profile requests.
    pub fn sign_in_as(&self, username: &str) {
        self.lock().signed_in = Some(username.to_string());
    }

    pub fn archive(&self, id: TaskId) {
        if let Ok(task) = self.lock().task_mut(id) {
            task.archived = true;
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    /// Current server-side copy of a board's tasks, archived ones included.
    pub fn stored_tasks(&self, board_id: BoardId) -> Vec<Task> {
        self.lock()
            .tasks
            .iter()
            .filter(|task| task.board_id == board_id)
            .cloned()
            .collect()
    }

    pub fn stored_boards(&self) -> Vec<Board> {
        self.lock().boards.clone()
    }

    /// The token issued by the last forgot-password request for `email`.
    pub fn reset_token_for(&self, email: &str) -> Option<String> {
        self.lock()
            .reset_tokens
            .iter()
            .rev()
            .find(|(e, _)| e == email)
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl BoardApi for InMemoryBackend {
    async fn list_boards(&self) -> TaskboardResult<Vec<Board>> {
        let mut store = self.lock();
        store.record("GET /api/v1/boards".to_string());
        Ok(store.boards.clone())
    }

    async fn create_board(&self, board: &NewBoard) -> TaskboardResult<Board> {
        let mut store = self.lock();
        store.record("POST /api/v1/boards".to_string());
        let name = normalize_name(&board.name);
        if store.boards.iter().any(|b| normalize_name(&b.name) == name) {
            return Err(TaskboardError::http(409, "Board with this name already exists"));
        }
        let id = store.next_id();
        let created = Board::new(id, board.name.trim(), board.columns.clone())
            .with_description(board.description.trim());
        store.boards.push(created.clone());
        Ok(created)
    }

    async fn delete_board(&self, id: BoardId) -> TaskboardResult<()> {
        let mut store = self.lock();
        store.record(format!("DELETE /api/v1/boards/{id}"));
        store.board(id)?;
        store.boards.retain(|board| board.id != id);
        store.tasks.retain(|task| task.board_id != id);
        Ok(())
    }
}

#[async_trait]
impl TaskApi for InMemoryBackend {
    async fn board_tasks(&self, board_id: BoardId, active_only: bool) -> TaskboardResult<Vec<Task>> {
        let mut store = self.lock();
        store.record(if active_only {
            format!("GET /api/v1/tasks/board/{board_id}?archived=false")
        } else {
            format!("GET /api/v1/tasks/board/{board_id}")
        });
        store.board(board_id)?;
        Ok(store
            .tasks
            .iter()
            .filter(|task| task.board_id == board_id && !(active_only && task.archived))
            .cloned()
            .collect())
    }

    async fn create_task(&self, draft: &TaskDraft) -> TaskboardResult<Task> {
        let mut store = self.lock();
        store.record("POST /api/v1/tasks".to_string());
        store.check_status(draft)?;
        let id = store.next_id();
        let now = Utc::now();
        let mut task = Task::new(id, draft.board_id, draft.title.clone(), draft.status.clone());
        task.description = Some(draft.description.clone()).filter(|d| !d.is_empty());
        task.priority = draft.priority;
        task.assigned_to = Some(draft.assigned_to.clone()).filter(|a| !a.is_empty());
        task.created_at = Some(now);
        task.updated_at = Some(now);
        store.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, draft: &TaskDraft) -> TaskboardResult<Task> {
        let mut store = self.lock();
        store.record(format!("PUT /api/v1/tasks/{id}"));
        store.check_status(draft)?;
        let task = store.task_mut(id)?;
        task.title = draft.title.clone();
        task.description = Some(draft.description.clone()).filter(|d| !d.is_empty());
        task.status = draft.status.clone();
        task.priority = draft.priority;
        task.assigned_to = Some(draft.assigned_to.clone()).filter(|a| !a.is_empty());
        task.updated_at = Some(Utc::now());
        Ok(task.clone())
    }

    async fn archive_task(&self, id: TaskId) -> TaskboardResult<()> {
        let mut store = self.lock();
        store.record(format!("DELETE /api/v1/tasks/{id}"));
        store.task_mut(id)?.archived = true;
        Ok(())
    }

    async fn archived_tasks(&self) -> TaskboardResult<Vec<Task>> {
        let mut store = self.lock();
        store.record("GET /api/v1/tasks/archived".to_string());
        Ok(store.tasks.iter().filter(|task| task.archived).cloned().collect())
    }

    async fn restore_task(&self, id: TaskId) -> TaskboardResult<()> {
        let mut store = self.lock();
        store.record(format!("PUT /api/v1/tasks/{id}/restore"));
        let task = store.task_mut(id)?;
        if !task.archived {
            return Err(TaskboardError::http(400, "Task is not archived"));
        }
        task.archived = false;
        Ok(())
    }
}

#[async_trait]
impl NotificationApi for InMemoryBackend {
    async fn list_notifications(&self) -> TaskboardResult<Vec<Notification>> {
        let mut store = self.lock();
        store.record("GET /api/v1/notifications".to_string());
        Ok(store.notifications.clone())
    }

    async fn mark_read(&self, id: NotificationId) -> TaskboardResult<()> {
        let mut store = self.lock();
        store.record(format!("PUT /api/v1/notifications/{id}/read"));
        let notification = store
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| TaskboardError::http(404, "Notification not found"))?;
        notification.read = true;
        Ok(())
    }

    async fn mark_all_read(&self) -> TaskboardResult<()> {
        let mut store = self.lock();
        store.record("PUT /api/v1/notifications/mark-all-read".to_string());
        for notification in &mut store.notifications {
            notification.read = true;
        }
        Ok(())
    }
}

#[async_trait]
impl UserApi for InMemoryBackend {
    async fn profile(&self) -> TaskboardResult<Profile> {
        let mut store = self.lock();
        store.record("GET /api/v1/auth/profile".to_string());
        let username = store
            .signed_in
            .clone()
            .ok_or_else(|| TaskboardError::http(401, "Unauthorized"))?;
        let account = store
            .accounts
            .iter()
            .find(|a| a.username == username)
            .ok_or_else(|| TaskboardError::http(404, "User not found"))?;
        Ok(Profile {
            username: account.username.clone(),
            email: account.email.clone(),
            role: account.role,
        })
    }

    async fn list_users(&self) -> TaskboardResult<Vec<UserSummary>> {
        let mut store = self.lock();
        store.record("GET /api/v1/admin/users".to_string());
        Ok(store
            .accounts
            .iter()
            .map(|a| UserSummary {
                username: a.username.clone(),
                email: a.email.clone(),
                role: a.role,
            })
            .collect())
    }
}

#[async_trait]
impl AuthApi for InMemoryBackend {
    async fn login(&self, credentials: &Credentials) -> TaskboardResult<LoginResponse> {
        let mut store = self.lock();
        store.record("POST /api/v1/login".to_string());
        let account = store
            .accounts
            .iter()
            .find(|a| a.username == credentials.username && a.password == credentials.password)
            .cloned()
            .ok_or_else(|| TaskboardError::http(401, "Invalid username or password"))?;
        store.signed_in = Some(account.username.clone());
        Ok(LoginResponse {
            token: Some(format!("memory-token-{}", account.username)),
            username: account.username,
            role: Some(account.role),
            email: Some(account.email),
        })
    }

    async fn email_registered(&self, email: &str) -> TaskboardResult<bool> {
        let mut store = self.lock();
        store.record(format!("GET /api/v1/register?email={email}"));
        Ok(store.accounts.iter().any(|a| a.email.eq_ignore_ascii_case(email)))
    }

    async fn register(&self, registration: &Registration) -> TaskboardResult<()> {
        let mut store = self.lock();
        store.record("POST /api/v1/register".to_string());
        let taken = store.accounts.iter().any(|a| {
            a.username == registration.username || a.email.eq_ignore_ascii_case(&registration.email)
        });
        if taken {
            return Err(TaskboardError::http(409, "Conflict"));
        }
        store.accounts.push(Account {
            username: registration.username.clone(),
            email: registration.email.clone(),
            password: registration.password.clone(),
            role: Role::User,
        });
        Ok(())
    }

    async fn forgot_password(&self, request: &ForgotPassword) -> TaskboardResult<Option<String>> {
        let mut store = self.lock();
        store.record("POST /api/v1/forgot-password".to_string());
        if !store.accounts.iter().any(|a| a.email.eq_ignore_ascii_case(&request.email)) {
            return Err(TaskboardError::http(404, "No account found with this email"));
        }
        let token = format!("reset-{}", store.next_id());
        store.reset_tokens.push((request.email.clone(), token));
        Ok(Some("Password reset link sent to your email".to_string()))
    }

    async fn reset_password(&self, request: &PasswordReset) -> TaskboardResult<Option<String>> {
        let mut store = self.lock();
        store.record("POST /api/v1/reset-password".to_string());
        let position = store
            .reset_tokens
            .iter()
            .position(|(_, token)| *token == request.token)
            .ok_or_else(|| TaskboardError::http(400, "Invalid or expired reset token"))?;
        let (email, _) = store.reset_tokens.remove(position);
        if let Some(account) = store.accounts.iter_mut().find(|a| a.email == email) {
            account.password = request.new_password.clone();
        }
        Ok(None)
    }
}
