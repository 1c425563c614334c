use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use taskboard_domain::{BoardId, NotificationId, TaskId};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TASKBOARD_COMMIT"),
    ")"
);

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Terminal client for a remote kanban task board", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Path to open when launching the terminal UI, e.g. /kanban or
    /// /reset-password?token=...
    #[arg(long, default_value = "/")]
    pub route: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Overrides for the config file.
#[derive(Args, Clone, Default)]
pub struct ConnectionArgs {
    /// Kanban service base URL
    #[arg(long, env = "TASKBOARD_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Authentication service base URL
    #[arg(long, env = "TASKBOARD_AUTH_URL", global = true)]
    pub auth_url: Option<String>,

    /// Session file holding the signed-in user
    #[arg(long, env = "TASKBOARD_STORAGE", global = true)]
    pub storage: Option<PathBuf>,

    /// Config file to read instead of the platform default
    #[arg(long, env = "TASKBOARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user and their effective role
    Whoami,
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Request a password reset link
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password using a reset token
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Board operations
    Board(BoardCommand),
    /// Task operations
    Task(TaskCommand),
    /// Archived task operations
    Archived(ArchivedCommand),
    /// Notification operations
    Notification(NotificationCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// List boards with their completion
    List,
    /// Create a board
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Column labels, comma separated. Defaults to To Do, In Progress, Review, Done.
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Delete a board and everything on it
    Delete {
        #[arg(long)]
        id: BoardId,
        /// Confirm the deletion. It cannot be undone.
        #[arg(long)]
        yes: bool,
    },
    /// Completion statistics for one board
    Stats {
        #[arg(long)]
        id: BoardId,
    },
}

#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List the active tasks of a board
    List {
        #[arg(long)]
        board_id: BoardId,
        /// Only tasks whose title, description or assignee contains this text
        #[arg(long)]
        query: Option<String>,
        /// Only tasks in this column
        #[arg(long)]
        status: Option<String>,
    },
    /// Create a task
    Create(TaskCreateArgs),
    /// Edit a task
    Update(TaskUpdateArgs),
    /// Move a task to another column
    Move {
        #[arg(long)]
        board_id: BoardId,
        #[arg(long)]
        id: TaskId,
        /// Target column
        #[arg(long)]
        to: String,
    },
    /// Archive a task
    Archive {
        #[arg(long)]
        board_id: BoardId,
        #[arg(long)]
        id: TaskId,
    },
}

#[derive(Args)]
pub struct TaskCreateArgs {
    #[arg(long)]
    pub board_id: BoardId,
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Low, Medium or High
    #[arg(long)]
    pub priority: Option<String>,
    /// Username of a non-admin user
    #[arg(long)]
    pub assignee: Option<String>,
    /// Column to create the task in. Defaults to the first column.
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct TaskUpdateArgs {
    #[arg(long)]
    pub board_id: BoardId,
    #[arg(long)]
    pub id: TaskId,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long, conflicts_with = "unassign")]
    pub assignee: Option<String>,
    #[arg(long)]
    pub unassign: bool,
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct ArchivedCommand {
    #[command(subcommand)]
    pub action: ArchivedAction,
}

#[derive(Subcommand)]
pub enum ArchivedAction {
    /// List archived tasks
    List {
        /// Only tasks of this board
        #[arg(long)]
        board_id: Option<BoardId>,
    },
    /// Bring an archived task back to its board
    Restore {
        #[arg(long)]
        id: TaskId,
    },
}

#[derive(Args)]
pub struct NotificationCommand {
    #[command(subcommand)]
    pub action: NotificationAction,
}

#[derive(Subcommand)]
pub enum NotificationAction {
    /// List notifications, newest first
    List {
        #[arg(long)]
        unread: bool,
    },
    /// Mark one notification read
    Read {
        #[arg(long)]
        id: NotificationId,
    },
    /// Mark every unread notification read
    ReadAll,
}
