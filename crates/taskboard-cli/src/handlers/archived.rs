use serde_json::json;
use taskboard_client::ArchivedController;
use taskboard_core::TaskboardError;
use taskboard_domain::ArchiveScope;

use crate::cli::ArchivedAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: ArchivedAction) -> anyhow::Result<()> {
    let role = ctx.role().await?;
    match action {
        ArchivedAction::List { board_id } => {
            let scope = board_id.map_or(ArchiveScope::All, ArchiveScope::Board);
            let archived = ArchivedController::open(ctx.services().clone(), role, scope).await?;
            if let Some(notice) = &archived.state.notice {
                return Err(TaskboardError::Validation(notice.message().to_string()).into());
            }
            output::output_list(archived.state.tasks().to_vec());
        }
        ArchivedAction::Restore { id } => {
            let mut archived =
                ArchivedController::open(ctx.services().clone(), role, ArchiveScope::All).await?;
            archived.restore(id).await?;
            output::output_success(json!({ "restored": id }));
        }
    }
    Ok(())
}
