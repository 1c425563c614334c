use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use taskboard_domain::Point;

use crate::app::{App, Focus, Press};

impl App {
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if !self.is_workspace() {
            return;
        }
        let point = Point::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_press(point),
            MouseEventKind::Drag(MouseButton::Left) => self.handle_drag(point),
            MouseEventKind::Up(MouseButton::Left) => self.handle_release(point),
            _ => {}
        }
    }

    fn handle_press(&mut self, point: Point) {
        if self.hit_map.on_bell(point) {
            self.bell.toggle();
            return;
        }
        if self.bell.is_open() {
            let regions = self.hit_map.bell_regions();
            if !self.bell.click_at(point, &regions) {
                if let Some(id) = self.hit_map.notification_at(point) {
                    self.mark_notification_read(id);
                }
                return;
            }
        }
        if self.has_modal() {
            return;
        }

        if let Some(board_id) = self.hit_map.board_at(point) {
            let board = self.boards.as_mut().and_then(|boards| {
                let index = boards.boards().iter().position(|s| s.board.id == board_id)?;
                boards.selected = index;
                boards.board(board_id).cloned()
            });
            if let Some(board) = board {
                self.open_board(board);
            }
            return;
        }

        if let Some(task) = self.hit_map.card_at(point) {
            self.focus = Focus::Board;
            self.press = Some(Press {
                task,
                dragging: false,
            });
        }
    }

    fn handle_drag(&mut self, point: Point) {
        let (Some(press), Some(board)) = (self.press.as_mut(), self.kanban.as_mut()) else {
            return;
        };
        if !press.dragging {
            press.dragging = true;
            if let Err(err) = board.begin_drag(press.task) {
                tracing::debug!(task_id = press.task, error = %err, "Drag refused");
                return;
            }
        }
        board.drag_to(&self.hit_map.columns, point);
    }

    /// A release without movement is a click: it toggles the card's detail.
    fn handle_release(&mut self, point: Point) {
        let Some(press) = self.press.take() else {
            return;
        };
        let Some(board) = self.kanban.as_mut() else {
            return;
        };
        if !press.dragging {
            board.select_task(press.task);
            board.toggle_expanded(press.task);
            return;
        }
        if !board.drag.is_active() {
            return;
        }
        if let Some(pending) = board.release(&self.hit_map.columns, point) {
            self.commit_move(pending);
        }
    }
}
