use async_trait::async_trait;
use taskboard_core::TaskboardResult;
use taskboard_domain::{Notification, NotificationId};

use super::NotificationApi;
use crate::http::ApiClient;

pub struct RemoteNotificationService {
    client: ApiClient,
}

impl RemoteNotificationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationApi for RemoteNotificationService {
    async fn list_notifications(&self) -> TaskboardResult<Vec<Notification>> {
        self.client.get("/api/v1/notifications").await
    }

    async fn mark_read(&self, id: NotificationId) -> TaskboardResult<()> {
        self.client
            .put_empty(&format!("/api/v1/notifications/{id}/read"))
            .await
    }

    async fn mark_all_read(&self) -> TaskboardResult<()> {
        self.client
            .put_empty("/api/v1/notifications/mark-all-read")
            .await
    }
}
