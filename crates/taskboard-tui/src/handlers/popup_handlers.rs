use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;

impl App {
    pub fn handle_bell_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') => self.bell.close(),
            KeyCode::Char('j') | KeyCode::Down => self.bell.select(1),
            KeyCode::Char('k') | KeyCode::Up => self.bell.select(-1),
            KeyCode::Enter => {
                if let Some(item) = self.bell.selected_item().filter(|item| !item.read) {
                    self.mark_notification_read(item.id);
                }
            }
            KeyCode::Char('R') => self.mark_all_notifications_read(),
            _ => {}
        }
    }

    pub fn handle_archived_key(&mut self, key: KeyEvent) {
        let Some(view) = self.archived.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('A') => self.archived = None,
            KeyCode::Char('j') | KeyCode::Down => view.select(1),
            KeyCode::Char('k') | KeyCode::Up => view.select(-1),
            KeyCode::Enter | KeyCode::Char('r') => self.restore_selected(),
            _ => {}
        }
    }
}
