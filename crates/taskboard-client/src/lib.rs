pub mod api;
pub mod controllers;
pub mod http;
pub mod jwt;
pub mod memory;
pub mod poller;
pub mod session;

pub use api::{
    AuthApi, BoardApi, LoginResponse, NotificationApi, RemoteAuthService, RemoteBoardService,
    RemoteNotificationService, RemoteTaskService, RemoteUserService, Services, TaskApi, UserApi,
};
pub use controllers::archived::ArchivedController;
pub use controllers::auth::AuthOutcome;
pub use controllers::board_list::BoardListController;
pub use controllers::kanban::KanbanController;
pub use controllers::notifications::{MarkAllOutcome, NotificationController};
pub use controllers::resolve_role;
pub use http::ApiClient;
pub use memory::InMemoryBackend;
pub use poller::Poller;
pub use session::{AuthSession, FileStorage, LocalStorage, MemoryStorage};
