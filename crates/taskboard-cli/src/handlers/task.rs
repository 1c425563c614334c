use serde_json::json;
use taskboard_client::KanbanController;
use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::{filter_tasks, BoardId, Priority, Task, TaskForm};

use crate::cli::{TaskAction, TaskCreateArgs, TaskUpdateArgs};
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: TaskAction) -> anyhow::Result<()> {
    match action {
        TaskAction::List {
            board_id,
            query,
            status,
        } => {
            let board = open(ctx, board_id).await?;
            let tasks = board.state.tasks();
            let mut matching = filter_tasks(tasks, query.as_deref().unwrap_or(""));
            if let Some(status) = status {
                matching.retain(|task| task.status == status);
            }
            output::output_list(matching);
        }
        TaskAction::Create(args) => {
            let task = create(ctx, args).await?;
            output::output_success(&task);
        }
        TaskAction::Update(args) => {
            let task = update(ctx, args).await?;
            output::output_success(&task);
        }
        TaskAction::Move { board_id, id, to } => {
            let mut board = open(ctx, board_id).await?;
            match board.move_task(id, &to).await? {
                Some(task) => output::output_success(json!({ "moved": true, "task": task })),
                None => output::output_success(json!({ "moved": false, "task": board.state.task(id) })),
            }
        }
        TaskAction::Archive { board_id, id } => {
            let mut board = open(ctx, board_id).await?;
            board.state.request_archive(id)?;
            board.archive_confirmed().await?;
            output::output_success(json!({ "archived": id }));
        }
    }
    Ok(())
}

async fn open(ctx: &CliContext, board_id: BoardId) -> TaskboardResult<KanbanController> {
    ctx.require_user()?;
    let board = ctx.board(board_id).await?;
    let controller =
        KanbanController::open(ctx.services().clone(), board, ctx.session.token()).await;
    if let Some(notice) = controller.state.notice.as_ref().filter(|n| n.is_error()) {
        return Err(TaskboardError::Validation(notice.message().to_string()));
    }
    Ok(controller)
}

async fn create(ctx: &CliContext, args: TaskCreateArgs) -> TaskboardResult<Task> {
    let mut board = open(ctx, args.board_id).await?;
    let column = match args.status {
        Some(status) => {
            require_column(&board, &status)?;
            status
        }
        None => board.state.board.first_column().unwrap_or_default().to_string(),
    };
    board.state.open_create_form(&column)?;
    let form = open_form(&mut board)?;
    form.title.set(args.title);
    form.description.set(args.description);
    if let Some(priority) = args.priority {
        form.priority = parse_priority(&priority)?;
    }
    form.assigned_to = args.assignee.filter(|name| !name.trim().is_empty());
    board.submit_form().await
}

async fn update(ctx: &CliContext, args: TaskUpdateArgs) -> TaskboardResult<Task> {
    let mut board = open(ctx, args.board_id).await?;
    if let Some(status) = &args.status {
        require_column(&board, status)?;
    }
    board.state.open_edit_form(args.id)?;
    let form = open_form(&mut board)?;
    if let Some(title) = args.title {
        form.title.set(title);
    }
    if let Some(description) = args.description {
        form.description.set(description);
    }
    if let Some(priority) = args.priority {
        form.priority = parse_priority(&priority)?;
    }
    if args.unassign {
        form.assigned_to = None;
    } else if let Some(assignee) = args.assignee {
        form.assigned_to = Some(assignee);
    }
    if let Some(status) = args.status {
        form.status = status;
    }
    board.submit_form().await
}

fn open_form(board: &mut KanbanController) -> TaskboardResult<&mut TaskForm> {
    board
        .state
        .form
        .as_mut()
        .ok_or_else(|| TaskboardError::Internal("Task form did not open".to_string()))
}

fn require_column(board: &KanbanController, column: &str) -> TaskboardResult<()> {
    if board.state.board.has_column(column) {
        return Ok(());
    }
    Err(TaskboardError::Validation(format!(
        "\"{column}\" is not a column of board \"{}\" (columns: {})",
        board.state.board.name,
        board.state.board.columns.join(", ")
    )))
}

fn parse_priority(value: &str) -> TaskboardResult<Priority> {
    value.parse().map_err(TaskboardError::Validation)
}
