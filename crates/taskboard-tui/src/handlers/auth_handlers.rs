use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskboard_domain::{AuthFormKind, Route};

use crate::app::App;
use crate::dialog::handle_text_input;

impl App {
    pub fn handle_auth_key(&mut self, key: KeyEvent) {
        let Some(kind) = self.auth_form.as_ref().map(|form| form.kind) else {
            return;
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('r') if ctrl && kind == AuthFormKind::Login => {
                self.auth_notice = None;
                self.navigate(Route::Register);
            }
            KeyCode::Char('f') if ctrl && kind == AuthFormKind::Login => {
                self.auth_notice = None;
                self.navigate(Route::ForgotPassword);
            }
            KeyCode::Esc if kind != AuthFormKind::Login => self.navigate(Route::Login),
            KeyCode::Enter => self.submit_auth(),
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = self.auth_form.as_mut() {
                    form.focus_next();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = self.auth_form.as_mut() {
                    form.focus_prev();
                }
            }
            _ => {
                if let Some(input) = self.auth_form.as_mut().and_then(|form| form.focused_input()) {
                    handle_text_input(input, key);
                }
            }
        }
    }
}
