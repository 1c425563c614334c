use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskboard_core::TextInput;

/// Apply an editing key to a text buffer. Returns false if the key is not an
/// editing key, leaving it for the caller.
///
/// Enter inserts a newline only in multiline buffers.
pub fn handle_text_input(input: &mut TextInput, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }
    match key.code {
        KeyCode::Char(c) => input.insert_char(c),
        KeyCode::Enter if input.is_multiline() => input.insert_newline(),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => return false,
    }
    true
}

/// Yes/no prompt keys.
pub fn handle_confirm_input(key_code: KeyCode) -> DialogAction {
    match key_code {
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => DialogAction::Cancel,
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => DialogAction::Confirm,
        _ => DialogAction::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    None,
    Cancel,
    Confirm,
}
