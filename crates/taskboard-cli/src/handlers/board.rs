use serde_json::json;
use taskboard_client::controllers::board_list;
use taskboard_client::BoardListController;
use taskboard_core::{TaskboardError, TextInput};
use taskboard_domain::{BoardForm, RefreshTrigger};

use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: BoardAction) -> anyhow::Result<()> {
    let role = ctx.role().await?;
    let mut boards = BoardListController::new(ctx.services().clone(), role);

    match action {
        BoardAction::List => {
            boards.refresh(RefreshTrigger::Manual).await?;
            output::output_success(json!({
                "items": boards.state.boards(),
                "count": boards.state.boards().len(),
                "overall": boards.state.overall(),
            }));
        }
        BoardAction::Create {
            name,
            description,
            columns,
        } => {
            boards.refresh(RefreshTrigger::Manual).await?;
            boards.state.open_create_form()?;
            if let Some(form) = boards.state.form.as_mut() {
                fill_form(form, name, description, columns);
            }
            let board = boards.submit_form().await?;
            output::output_success(&board);
        }
        BoardAction::Delete { id, yes } => {
            boards.refresh(RefreshTrigger::Manual).await?;
            let prompt = boards.state.request_delete(id)?;
            if !yes {
                boards.state.cancel_delete();
                return Err(TaskboardError::Validation(format!(
                    "{prompt} Re-run with --yes to confirm."
                ))
                .into());
            }
            boards.delete_confirmed().await?;
            output::output_success(json!({ "deleted": id }));
        }
        BoardAction::Stats { id } => {
            let board = ctx.board(id).await?;
            let stats = board_list::board_stats(ctx.services(), board.id).await?;
            output::output_success(json!({ "board": board, "stats": stats }));
        }
    }
    Ok(())
}

fn fill_form(form: &mut BoardForm, name: String, description: String, columns: Vec<String>) {
    form.name.set(name);
    form.description.set(description);
    if !columns.is_empty() {
        form.columns = columns.into_iter().map(TextInput::with_text).collect();
    }
}
