pub mod archived;
pub mod auth_forms;
pub mod board;
pub mod board_form;
pub mod board_list;
pub mod board_view;
pub mod drag;
pub mod geometry;
pub mod notice;
pub mod notification;
pub mod notifications;
pub mod permissions;
pub mod routing;
pub mod search;
pub mod serde_helpers;
pub mod stats;
pub mod task;
pub mod task_form;
pub mod ticket;
pub mod user;

pub use archived::{ArchiveScope, ArchivedTasksState};
pub use auth_forms::{
    password_strength, AuthForm, AuthFormKind, AuthRequest, Credentials, ForgotPassword,
    PasswordReset, PasswordStrength, Registration,
};
pub use board::{Board, BoardId, NewBoard, DEFAULT_COLUMNS};
pub use board_form::{validate_board, BoardForm, BoardFormFocus};
pub use board_list::{BoardListState, BoardSummary, RefreshTrigger};
pub use board_view::{KanbanBoardState, TaskSubmission};
pub use drag::{ColumnRect, DragState, DropOutcome, PendingMove};
pub use geometry::{Point, Region};
pub use notice::Notice;
pub use notification::{format_relative, Notification, NotificationId, NotificationKind};
pub use notifications::NotificationFeed;
pub use permissions::{authorize, GuardedAction};
pub use routing::{resolve, Route, Screen};
pub use search::{filter_tasks, CompositeSearcher, TaskSearcher};
pub use stats::BoardStats;
pub use task::{Priority, Task, TaskDraft, TaskId};
pub use task_form::{validate_task, TaskForm, TaskFormFocus, TaskFormMode};
pub use ticket::Ticket;
pub use user::{assignable_users, Profile, Role, User, UserSummary};
