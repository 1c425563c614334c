//! Remote service boundary.
//!
//! One trait per backend resource, each with a reqwest implementation. The
//! kanban service serves boards, tasks and notifications; the auth service
//! serves sign-in, registration, profiles and the user directory.

mod auth;
mod boards;
mod notifications;
mod tasks;
mod users;

use std::sync::Arc;

use async_trait::async_trait;
use taskboard_core::{AppConfig, TaskboardResult};
use taskboard_domain::{
    Board, BoardId, Credentials, ForgotPassword, NewBoard, Notification, NotificationId,
    PasswordReset, Profile, Registration, Task, TaskDraft, TaskId, UserSummary,
};

pub use auth::{LoginResponse, RemoteAuthService};
pub use boards::RemoteBoardService;
pub use notifications::RemoteNotificationService;
pub use tasks::RemoteTaskService;
pub use users::RemoteUserService;

use crate::http::ApiClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn list_boards(&self) -> TaskboardResult<Vec<Board>>;
    async fn create_board(&self, board: &NewBoard) -> TaskboardResult<Board>;
    async fn delete_board(&self, id: BoardId) -> TaskboardResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Tasks of one board. `active_only` asks the server to leave out archived ones.
    async fn board_tasks(&self, board_id: BoardId, active_only: bool) -> TaskboardResult<Vec<Task>>;
    async fn create_task(&self, draft: &TaskDraft) -> TaskboardResult<Task>;
    async fn update_task(&self, id: TaskId, draft: &TaskDraft) -> TaskboardResult<Task>;
    /// Soft delete: the server marks the task archived.
    async fn archive_task(&self, id: TaskId) -> TaskboardResult<()>;
    async fn archived_tasks(&self) -> TaskboardResult<Vec<Task>>;
    async fn restore_task(&self, id: TaskId) -> TaskboardResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationApi: Send + Sync {
    async fn list_notifications(&self) -> TaskboardResult<Vec<Notification>>;
    async fn mark_read(&self, id: NotificationId) -> TaskboardResult<()>;
    async fn mark_all_read(&self) -> TaskboardResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn profile(&self) -> TaskboardResult<Profile>;
    async fn list_users(&self) -> TaskboardResult<Vec<UserSummary>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> TaskboardResult<LoginResponse>;
    /// True if an account already uses this email.
    async fn email_registered(&self, email: &str) -> TaskboardResult<bool>;
    async fn register(&self, registration: &Registration) -> TaskboardResult<()>;
    async fn forgot_password(&self, request: &ForgotPassword) -> TaskboardResult<Option<String>>;
    async fn reset_password(&self, request: &PasswordReset) -> TaskboardResult<Option<String>>;
}

/// Every service a view may call, passed explicitly from the composition root.
#[derive(Clone)]
pub struct Services {
    pub boards: Arc<dyn BoardApi>,
    pub tasks: Arc<dyn TaskApi>,
    pub notifications: Arc<dyn NotificationApi>,
    pub users: Arc<dyn UserApi>,
    pub auth: Arc<dyn AuthApi>,
}

impl Services {
    /// Reqwest-backed services for the configured endpoints.
    pub fn remote(config: &AppConfig, token: Option<&str>) -> TaskboardResult<Self> {
        let timeout = config.request_timeout();
        let kanban = ApiClient::new(&config.api_url, timeout)?.with_token(token);
        let auth = ApiClient::new(&config.auth_url, timeout)?.with_token(token);
        Ok(Self {
            boards: Arc::new(RemoteBoardService::new(kanban.clone())),
            tasks: Arc::new(RemoteTaskService::new(kanban.clone())),
            notifications: Arc::new(RemoteNotificationService::new(kanban)),
            users: Arc::new(RemoteUserService::new(auth.clone())),
            auth: Arc::new(RemoteAuthService::new(auth)),
        })
    }

    /// All services answered by one in-memory backend.
    pub fn in_memory(backend: Arc<crate::memory::InMemoryBackend>) -> Self {
        Self {
            boards: backend.clone(),
            tasks: backend.clone(),
            notifications: backend.clone(),
            users: backend.clone(),
            auth: backend,
        }
    }
}
