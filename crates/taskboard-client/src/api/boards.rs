use async_trait::async_trait;
use taskboard_core::TaskboardResult;
use taskboard_domain::{Board, BoardId, NewBoard};

use super::BoardApi;
use crate::http::ApiClient;

pub struct RemoteBoardService {
    client: ApiClient,
}

impl RemoteBoardService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BoardApi for RemoteBoardService {
    async fn list_boards(&self) -> TaskboardResult<Vec<Board>> {
        self.client.get("/api/v1/boards").await
    }

    async fn create_board(&self, board: &NewBoard) -> TaskboardResult<Board> {
        let created: Board = self.client.post("/api/v1/boards", board).await?;
        tracing::info!(board_id = created.id, name = %created.name, "Created board");
        Ok(created)
    }

    async fn delete_board(&self, id: BoardId) -> TaskboardResult<()> {
        self.client.delete(&format!("/api/v1/boards/{id}")).await?;
        tracing::info!(board_id = id, "Deleted board");
        Ok(())
    }
}
