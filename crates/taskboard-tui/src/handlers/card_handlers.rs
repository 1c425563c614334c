use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskboard_domain::TaskFormFocus;

use crate::app::App;
use crate::dialog::{handle_confirm_input, handle_text_input, DialogAction};

impl App {
    /// Archive confirmation, task form, keyboard drag or search. Returns false
    /// if none of them is active.
    pub fn handle_card_popup_key(&mut self, key: KeyEvent) -> bool {
        let Some(board) = self.kanban.as_mut() else {
            return false;
        };

        if board.confirm_archive.is_some() {
            match handle_confirm_input(key.code) {
                DialogAction::Confirm => self.confirm_archive(),
                DialogAction::Cancel => board.cancel_archive(),
                DialogAction::None => {}
            }
            return true;
        }

        if board.form.is_some() {
            self.handle_task_form_key(key);
            return true;
        }

        if board.drag.is_active() {
            match key.code {
                KeyCode::Char('h') | KeyCode::Left => board.drag_step(-1),
                KeyCode::Char('l') | KeyCode::Right => board.drag_step(1),
                KeyCode::Enter | KeyCode::Char('m') => {
                    if let Some(pending) = board.drop_hovered() {
                        self.commit_move(pending);
                    }
                }
                KeyCode::Esc => board.abandon_drag(),
                _ => {}
            }
            return true;
        }

        if self.searching {
            match key.code {
                KeyCode::Esc => {
                    board.set_query("");
                    self.searching = false;
                }
                KeyCode::Enter => self.searching = false,
                _ => {
                    let mut query = board.query.clone();
                    if handle_text_input(&mut query, key) {
                        board.set_query(query.as_str());
                    }
                }
            }
            return true;
        }
        false
    }

    fn handle_task_form_key(&mut self, key: KeyEvent) {
        let Some(board) = self.kanban.as_mut() else {
            return;
        };
        let users = board.users().to_vec();
        let Some(form) = board.form.as_mut() else {
            return;
        };

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match (key.code, form.focus) {
            (KeyCode::Esc, _) => board.cancel_form(),
            (KeyCode::Char('s'), _) if ctrl => self.submit_task_form(),
            (KeyCode::Tab, _) => form.focus = form.focus.next(),
            (KeyCode::BackTab, _) => form.focus = form.focus.prev(),
            (KeyCode::Enter, focus) if focus != TaskFormFocus::Description => {
                self.submit_task_form()
            }
            (KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right, TaskFormFocus::Priority) => {
                form.cycle_priority()
            }
            (KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right, TaskFormFocus::AssignedTo) => {
                form.cycle_assignee(&users)
            }
            _ => {
                if let Some(input) = form.focused_input() {
                    handle_text_input(input, key);
                }
            }
        }
    }

    pub fn handle_kanban_key(&mut self, key: KeyEvent) {
        let Some(board) = self.kanban.as_mut() else {
            return;
        };
        let selected = board.selected_task().map(|task| task.id);
        let result = match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                board.select_column(-1);
                Ok(())
            }
            KeyCode::Char('l') | KeyCode::Right => {
                board.select_column(1);
                Ok(())
            }
            KeyCode::Char('j') | KeyCode::Down => {
                board.select_row(1);
                Ok(())
            }
            KeyCode::Char('k') | KeyCode::Up => {
                board.select_row(-1);
                Ok(())
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = selected {
                    board.toggle_expanded(id);
                }
                Ok(())
            }
            KeyCode::Esc => {
                if board.expanded.is_some() {
                    board.expanded = None;
                } else {
                    board.set_query("");
                }
                Ok(())
            }
            KeyCode::Char('/') => {
                self.searching = true;
                Ok(())
            }
            KeyCode::Char('n') => {
                let column = board
                    .board
                    .columns
                    .get(board.selected_column)
                    .cloned()
                    .unwrap_or_default();
                board.open_create_form(&column)
            }
            KeyCode::Char('e') => match selected {
                Some(id) => board.open_edit_form(id),
                None => Ok(()),
            },
            KeyCode::Char('a') => match selected {
                Some(id) => board.request_archive(id),
                None => Ok(()),
            },
            KeyCode::Char('m') => match selected {
                Some(id) => board.begin_drag(id).map(|()| board.drag_step(0)),
                None => Ok(()),
            },
            KeyCode::Char('r') => {
                let board_id = board.board.id;
                self.load_board(board_id);
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            tracing::debug!(error = %err, "Board action refused");
        }
    }
}
