//! Board management dashboard state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use taskboard_core::{TaskboardError, TaskboardResult};

use crate::board::{Board, BoardId, NewBoard};
use crate::board_form::BoardForm;
use crate::notice::Notice;
use crate::permissions::{authorize, GuardedAction};
use crate::stats::BoardStats;
use crate::ticket::{Ticket, TicketCounter};
use crate::user::Role;

pub const DELETE_FAILED: &str = "Failed to delete board";

pub fn delete_confirmation(name: &str) -> String {
    format!("Are you sure you want to delete \"{name}\"? This action cannot be undone.")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    #[serde(flatten)]
    pub board: Board,
    pub stats: BoardStats,
}

impl BoardSummary {
    pub fn new(board: Board, stats: BoardStats) -> Self {
        Self { board, stats }
    }
}

/// Why a refresh was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Manual,
    Poll,
    Mutation,
}

#[derive(Debug, Clone)]
pub struct BoardListState {
    pub role: Role,
    boards: Vec<BoardSummary>,
    overall: BoardStats,
    tickets: TicketCounter,
    pub last_refresh: Option<DateTime<Utc>>,
    pub selected: usize,
    pub form: Option<BoardForm>,
    pub confirm_delete: Option<BoardId>,
    pub notice: Option<Notice>,
}

impl BoardListState {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            boards: Vec::new(),
            overall: BoardStats::default(),
            tickets: TicketCounter::default(),
            last_refresh: None,
            selected: 0,
            form: None,
            confirm_delete: None,
            notice: None,
        }
    }

    pub fn boards(&self) -> &[BoardSummary] {
        &self.boards
    }

    pub fn overall(&self) -> BoardStats {
        self.overall
    }

    pub fn board(&self, id: BoardId) -> Option<&Board> {
        self.boards.iter().map(|s| &s.board).find(|b| b.id == id)
    }

    pub fn existing_boards(&self) -> Vec<Board> {
        self.boards.iter().map(|s| s.board.clone()).collect()
    }

    /// A fetch is outstanding; the manual refresh control is disabled.
    pub fn in_flight(&self) -> bool {
        self.tickets.outstanding()
    }

    /// Start a refresh. A manual refresh is refused while one is in flight;
    /// polls and post-mutation refreshes always go out.
    pub fn begin_refresh(&mut self, trigger: RefreshTrigger) -> Option<Ticket> {
        if trigger == RefreshTrigger::Manual && self.in_flight() {
            return None;
        }
        let ticket = self.tickets.issue();
        tracing::debug!(ticket = ticket.value(), ?trigger, "Refreshing boards");
        Some(ticket)
    }

    /// Apply a completed refresh unless a newer one has already been applied.
    pub fn refresh_loaded(
        &mut self,
        ticket: Ticket,
        boards: Vec<BoardSummary>,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.tickets.accept(ticket) {
            return false;
        }
        self.overall = BoardStats::overall(boards.iter().map(|s| &s.stats));
        self.boards = boards;
        self.last_refresh = Some(now);
        self.selected = self.selected.min(self.boards.len().saturating_sub(1));
        true
    }

    pub fn refresh_failed(&mut self, ticket: Ticket, err: &TaskboardError) {
        // Consume the ticket so the manual refresh control becomes usable again.
        if self.tickets.is_latest(ticket) {
            self.tickets.accept(ticket);
        }
        self.notice = Some(Notice::from(err));
    }

    /// New figures for one board, e.g. after a task moved on its Kanban view.
    pub fn update_stats(&mut self, id: BoardId, stats: BoardStats) {
        if let Some(summary) = self.boards.iter_mut().find(|s| s.board.id == id) {
            summary.stats = stats;
        }
        self.overall = BoardStats::overall(self.boards.iter().map(|s| &s.stats));
    }

    pub fn selected_board(&self) -> Option<&Board> {
        self.boards.get(self.selected).map(|s| &s.board)
    }

    pub fn select(&mut self, step: isize) {
        if self.boards.is_empty() {
            return;
        }
        let next = (self.selected as isize + step).clamp(0, self.boards.len() as isize - 1);
        self.selected = next as usize;
    }

    pub fn open_create_form(&mut self) -> TaskboardResult<()> {
        self.guard(GuardedAction::CreateBoard)?;
        self.form = Some(BoardForm::new());
        Ok(())
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    pub fn submit_form(&mut self) -> TaskboardResult<NewBoard> {
        self.guard(GuardedAction::CreateBoard)?;
        let existing = self.existing_boards();
        let form = self
            .form
            .as_mut()
            .ok_or_else(|| TaskboardError::Internal("No board form is open".to_string()))?;
        form.submit(&existing)
            .ok_or_else(|| TaskboardError::InvalidInput(form.errors.clone()))
    }

    pub fn board_created(&mut self, board: Board) {
        self.form = None;
        self.notice = Some(Notice::info(format!("Board \"{}\" created", board.name)));
        self.boards.push(BoardSummary::new(board, BoardStats::default()));
        self.overall = BoardStats::overall(self.boards.iter().map(|s| &s.stats));
    }

    pub fn create_failed(&mut self, err: &TaskboardError) {
        tracing::warn!(error = %err, "Creating board failed");
        if let Some(form) = self.form.as_mut() {
            form.failed();
        }
        self.notice = Some(Notice::error(format!(
            "Error creating board: {}",
            err.user_message()
        )));
    }

    pub fn request_delete(&mut self, id: BoardId) -> TaskboardResult<String> {
        self.guard(GuardedAction::DeleteBoard)?;
        let board = self
            .board(id)
            .ok_or_else(|| TaskboardError::NotFound(format!("Board {id}")))?;
        let prompt = delete_confirmation(&board.name);
        self.confirm_delete = Some(id);
        Ok(prompt)
    }

    pub fn confirm_delete(&mut self) -> Option<BoardId> {
        self.confirm_delete.take()
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    pub fn board_deleted(&mut self, id: BoardId) {
        self.boards.retain(|s| s.board.id != id);
        self.overall = BoardStats::overall(self.boards.iter().map(|s| &s.stats));
        self.selected = self.selected.min(self.boards.len().saturating_sub(1));
        self.notice = Some(Notice::info("Board deleted"));
    }

    pub fn delete_failed(&mut self, err: &TaskboardError) {
        tracing::warn!(error = %err, "Deleting board failed");
        self.notice = Some(Notice::error(DELETE_FAILED));
    }

    fn guard(&mut self, action: GuardedAction) -> TaskboardResult<()> {
        authorize(self.role, action).inspect_err(|err| {
            self.notice = Some(Notice::from(err));
        })
    }
}
