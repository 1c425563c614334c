use async_trait::async_trait;
use taskboard_core::TaskboardResult;
use taskboard_domain::{BoardId, Task, TaskDraft, TaskId};

use super::TaskApi;
use crate::http::ApiClient;

pub struct RemoteTaskService {
    client: ApiClient,
}

impl RemoteTaskService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskApi for RemoteTaskService {
    async fn board_tasks(&self, board_id: BoardId, active_only: bool) -> TaskboardResult<Vec<Task>> {
        let path = format!("/api/v1/tasks/board/{board_id}");
        if active_only {
            self.client
                .get_with_query(&path, &[("archived", "false")])
                .await
        } else {
            self.client.get(&path).await
        }
    }

    async fn create_task(&self, draft: &TaskDraft) -> TaskboardResult<Task> {
        let task: Task = self.client.post("/api/v1/tasks", draft).await?;
        tracing::info!(task_id = task.id, board_id = task.board_id, "Created task");
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, draft: &TaskDraft) -> TaskboardResult<Task> {
        let task: Task = self.client.put(&format!("/api/v1/tasks/{id}"), draft).await?;
        tracing::info!(task_id = id, status = %task.status, "Updated task");
        Ok(task)
    }

    async fn archive_task(&self, id: TaskId) -> TaskboardResult<()> {
        self.client.delete(&format!("/api/v1/tasks/{id}")).await?;
        tracing::info!(task_id = id, "Archived task");
        Ok(())
    }

    async fn archived_tasks(&self) -> TaskboardResult<Vec<Task>> {
        self.client.get("/api/v1/tasks/archived").await
    }

    async fn restore_task(&self, id: TaskId) -> TaskboardResult<()> {
        self.client
            .put_empty(&format!("/api/v1/tasks/{id}/restore"))
            .await?;
        tracing::info!(task_id = id, "Restored task");
        Ok(())
    }
}
