use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskboard_domain::{BoardFormFocus, RefreshTrigger};

use crate::app::App;
use crate::dialog::{handle_confirm_input, handle_text_input, DialogAction};

impl App {
    /// Board form or delete confirmation. Returns false if neither is open.
    pub fn handle_board_popup_key(&mut self, key: KeyEvent) -> bool {
        let Some(boards) = self.boards.as_mut() else {
            return false;
        };
        if boards.confirm_delete.is_some() {
            match handle_confirm_input(key.code) {
                DialogAction::Confirm => self.confirm_board_delete(),
                DialogAction::Cancel => boards.cancel_delete(),
                DialogAction::None => {}
            }
            return true;
        }
        let Some(form) = boards.form.as_mut() else {
            return false;
        };

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => boards.cancel_form(),
            KeyCode::Char('s') if ctrl => self.submit_board_form(),
            KeyCode::Char('n') if ctrl => form.add_column(),
            KeyCode::Char('d') if ctrl => {
                if let BoardFormFocus::Column(index) = form.focus {
                    form.remove_column(index);
                }
            }
            KeyCode::Tab => form.focus_next(),
            KeyCode::BackTab => form.focus_prev(),
            KeyCode::Enter if form.focus != BoardFormFocus::Description => {
                self.submit_board_form()
            }
            _ => {
                if let Some(input) = form.focused_input() {
                    handle_text_input(input, key);
                }
            }
        }
        true
    }

    pub fn handle_board_list_key(&mut self, key: KeyEvent) {
        let Some(boards) = self.boards.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => boards.select(1),
            KeyCode::Char('k') | KeyCode::Up => boards.select(-1),
            KeyCode::Enter => {
                if let Some(board) = boards.selected_board().cloned() {
                    self.open_board(board);
                }
            }
            KeyCode::Char('n') => {
                if let Err(err) = boards.open_create_form() {
                    tracing::debug!(error = %err, "Board form refused");
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = boards.selected_board().map(|board| board.id) {
                    if let Err(err) = boards.request_delete(id) {
                        tracing::debug!(error = %err, "Board delete refused");
                    }
                }
            }
            KeyCode::Char('r') => self.refresh_boards(RefreshTrigger::Manual),
            _ => {}
        }
    }
}
