use chrono::Utc;
use serde_json::json;
use taskboard_client::NotificationController;
use taskboard_domain::Notification;

use crate::cli::NotificationAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: NotificationAction) -> anyhow::Result<()> {
    ctx.require_user()?;
    let mut bell = NotificationController::new(ctx.services().clone());
    bell.poll(Utc::now()).await?;

    match action {
        NotificationAction::List { unread } => {
            let items: Vec<&Notification> = bell
                .feed
                .items()
                .iter()
                .filter(|item| !unread || !item.read)
                .collect();
            output::output_success(json!({
                "count": items.len(),
                "unread": bell.feed.unread_count(),
                "badge": bell.feed.badge(),
                "items": items,
            }));
        }
        NotificationAction::Read { id } => {
            bell.mark_read(id).await?;
            output::output_success(json!({ "read": id, "unread": bell.feed.unread_count() }));
        }
        NotificationAction::ReadAll => {
            let marked = bell.feed.unread_ids();
            bell.mark_all_read().await?;
            output::output_success(json!({ "read": marked, "unread": bell.feed.unread_count() }));
        }
    }
    Ok(())
}
