//! Notification bell requests.

use chrono::{DateTime, Utc};
use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::{Notification, NotificationFeed, NotificationId};

use crate::api::Services;

pub async fn fetch(services: &Services) -> TaskboardResult<Vec<Notification>> {
    services.notifications.list_notifications().await
}

pub async fn mark_read(services: &Services, id: NotificationId) -> TaskboardResult<()> {
    services.notifications.mark_read(id).await
}

/// Which notifications were confirmed read, and the first failure if any.
#[derive(Debug)]
pub struct MarkAllOutcome {
    pub marked: Vec<NotificationId>,
    pub error: Option<TaskboardError>,
}

/// Use the bulk endpoint; if it fails, mark each unread notification in turn.
pub async fn mark_all_read(services: &Services, unread: Vec<NotificationId>) -> MarkAllOutcome {
    let bulk_error = match services.notifications.mark_all_read().await {
        Ok(()) => {
            return MarkAllOutcome {
                marked: unread,
                error: None,
            }
        }
        Err(err) => err,
    };
    tracing::warn!(error = %bulk_error, count = unread.len(), "Bulk mark-read failed, marking individually");

    let mut marked = Vec::with_capacity(unread.len());
    let mut error = None;
    for id in unread {
        match services.notifications.mark_read(id).await {
            Ok(()) => marked.push(id),
            Err(err) => {
                tracing::warn!(notification_id = id, error = %err, "Marking notification read failed");
                error.get_or_insert(err);
            }
        }
    }
    MarkAllOutcome { marked, error }
}

pub struct NotificationController {
    services: Services,
    pub feed: NotificationFeed,
}

impl NotificationController {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            feed: NotificationFeed::new(),
        }
    }

    pub async fn poll(&mut self, now: DateTime<Utc>) -> TaskboardResult<bool> {
        let ticket = self.feed.begin_poll();
        match fetch(&self.services).await {
            Ok(items) => Ok(self.feed.apply(ticket, items, now)),
            Err(err) => {
                tracing::warn!(error = %err, "Notification poll failed");
                self.feed.poll_failed(ticket, &err);
                Err(err)
            }
        }
    }

    pub async fn mark_read(&mut self, id: NotificationId) -> TaskboardResult<()> {
        match mark_read(&self.services, id).await {
            Ok(()) => {
                self.feed.marked_read(id);
                Ok(())
            }
            Err(err) => {
                self.feed.action_failed(&err);
                Err(err)
            }
        }
    }

    pub async fn mark_all_read(&mut self) -> TaskboardResult<()> {
        let outcome = mark_all_read(&self.services, self.feed.unread_ids()).await;
        for id in &outcome.marked {
            self.feed.marked_read(*id);
        }
        match outcome.error {
            Some(err) => {
                self.feed.action_failed(&err);
                Err(err)
            }
            None => Ok(()),
        }
    }
}
