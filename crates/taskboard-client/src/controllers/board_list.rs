//! Board management requests.

use chrono::Utc;
use futures::future::join_all;
use taskboard_core::TaskboardResult;
use taskboard_domain::{
    Board, BoardId, BoardListState, BoardStats, BoardSummary, NewBoard, RefreshTrigger, Role,
};

use crate::api::Services;

/// Completion figures for one board, counted over all of its tasks.
pub async fn board_stats(services: &Services, board_id: BoardId) -> TaskboardResult<BoardStats> {
    let tasks = services.tasks.board_tasks(board_id, false).await?;
    Ok(BoardStats::from_tasks(&tasks))
}

/// Every board with its statistics. Stats are fetched concurrently; a board
/// whose tasks cannot be read is listed with empty stats.
pub async fn fetch_summaries(services: &Services) -> TaskboardResult<Vec<BoardSummary>> {
    let boards = services.boards.list_boards().await?;
    let stats = join_all(boards.iter().map(|board| board_stats(services, board.id))).await;
    let summaries = boards
        .into_iter()
        .zip(stats)
        .map(|(board, stats)| {
            let stats = stats.unwrap_or_else(|err| {
                tracing::warn!(board_id = board.id, error = %err, "Board stats unavailable");
                BoardStats::default()
            });
            BoardSummary::new(board, stats)
        })
        .collect::<Vec<_>>();
    tracing::debug!(boards = summaries.len(), "Fetched boards");
    Ok(summaries)
}

pub async fn create_board(services: &Services, board: &NewBoard) -> TaskboardResult<Board> {
    let created = services.boards.create_board(board).await?;
    tracing::info!(board_id = created.id, name = %created.name, "Created board");
    Ok(created)
}

pub async fn delete_board(services: &Services, id: BoardId) -> TaskboardResult<()> {
    services.boards.delete_board(id).await?;
    tracing::info!(board_id = id, "Deleted board");
    Ok(())
}

pub struct BoardListController {
    services: Services,
    pub state: BoardListState,
}

impl BoardListController {
    pub fn new(services: Services, role: Role) -> Self {
        Self {
            services,
            state: BoardListState::new(role),
        }
    }

    /// Re-fetch boards and stats. Returns false when the refresh was refused
    /// or a newer one already landed.
    pub async fn refresh(&mut self, trigger: RefreshTrigger) -> TaskboardResult<bool> {
        let Some(ticket) = self.state.begin_refresh(trigger) else {
            return Ok(false);
        };
        match fetch_summaries(&self.services).await {
            Ok(boards) => Ok(self.state.refresh_loaded(ticket, boards, Utc::now())),
            Err(err) => {
                self.state.refresh_failed(ticket, &err);
                Err(err)
            }
        }
    }

    /// Recount one board after its tasks changed elsewhere.
    pub async fn refresh_stats(&mut self, board_id: BoardId) -> TaskboardResult<BoardStats> {
        let stats = board_stats(&self.services, board_id).await?;
        self.state.update_stats(board_id, stats);
        Ok(stats)
    }

    /// Validate the open board form and create the board.
    pub async fn submit_form(&mut self) -> TaskboardResult<Board> {
        let new_board = self.state.submit_form()?;
        match create_board(&self.services, &new_board).await {
            Ok(board) => {
                self.state.board_created(board.clone());
                if let Err(err) = self.refresh(RefreshTrigger::Mutation).await {
                    tracing::warn!(error = %err, "Refresh after create failed");
                }
                Ok(board)
            }
            Err(err) => {
                self.state.create_failed(&err);
                Err(err)
            }
        }
    }

    /// Delete the board awaiting confirmation, if any.
    pub async fn delete_confirmed(&mut self) -> TaskboardResult<Option<BoardId>> {
        let Some(id) = self.state.confirm_delete() else {
            return Ok(None);
        };
        match delete_board(&self.services, id).await {
            Ok(()) => {
                self.state.board_deleted(id);
                Ok(Some(id))
            }
            Err(err) => {
                self.state.delete_failed(&err);
                Err(err)
            }
        }
    }
}
