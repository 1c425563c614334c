pub mod auth_handlers;
pub mod board_handlers;
pub mod card_handlers;
pub mod mouse_handlers;
pub mod popup_handlers;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use taskboard_domain::{Route, Screen};

use crate::app::{App, Focus};
use crate::events::{is_interrupt, should_quit};

impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if is_interrupt(&key) {
            self.should_quit = true;
            return;
        }
        match self.screen() {
            Screen::Login
            | Screen::Register
            | Screen::ForgotPassword
            | Screen::ResetPassword { .. } => self.handle_auth_key(key),
            Screen::Dashboard | Screen::AdminDashboard | Screen::UserDashboard => {
                self.handle_workspace_key(key)
            }
            Screen::Home | Screen::NotFound(_) => match key.code {
                KeyCode::Enter | KeyCode::Esc => self.navigate(Route::Home),
                _ if should_quit(&key) => self.should_quit = true,
                _ => {}
            },
        }
    }

    /// Innermost layer first: the open overlay or form gets the key, then
    /// global shortcuts, then the focused pane.
    fn handle_workspace_key(&mut self, key: KeyEvent) {
        if self.bell.is_open() {
            self.handle_bell_key(key);
            return;
        }
        if self.archived.is_some() {
            self.handle_archived_key(key);
            return;
        }
        if self.handle_board_popup_key(key) || self.handle_card_popup_key(key) {
            return;
        }

        match key.code {
            _ if should_quit(&key) => self.should_quit = true,
            KeyCode::Char('L') => self.logout(),
            KeyCode::Char('b') => self.bell.toggle(),
            KeyCode::Char('A') => self.open_archived(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Boards if self.kanban.is_some() => Focus::Board,
                    _ => Focus::Boards,
                };
            }
            _ => match self.focus {
                Focus::Boards => self.handle_board_list_key(key),
                Focus::Board => self.handle_kanban_key(key),
            },
        }
    }
}
