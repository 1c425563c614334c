use crate::theme::{error_text, focused_border, label_text, normal_text, unfocused_border};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use taskboard_core::TextInput;

/// One labelled text input with its validation message underneath.
pub struct TextField<'a> {
    pub label: &'a str,
    pub input: &'a TextInput,
    pub focused: bool,
    pub masked: bool,
    pub error: Option<&'a str>,
}

impl<'a> TextField<'a> {
    pub fn new(label: &'a str, input: &'a TextInput) -> Self {
        Self {
            label,
            input,
            focused: false,
            masked: false,
            error: None,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    /// Needs at least four rows: the bordered input and one for the error.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let text = if self.masked {
            "*".repeat(self.input.as_str().chars().count())
        } else {
            self.input.as_str().to_string()
        };
        let border = if self.focused {
            focused_border()
        } else {
            unfocused_border()
        };
        let input = Paragraph::new(text).style(normal_text()).block(
            Block::default()
                .title(Span::styled(format!(" {} ", self.label), label_text()))
                .borders(Borders::ALL)
                .border_style(border),
        );
        frame.render_widget(input, chunks[0]);

        if let Some(error) = self.error {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(error, error_text()))),
                chunks[1],
            );
        }

        if self.focused {
            let (row, column) = cursor_offset(self.input);
            let x = chunks[0].x + 1 + column as u16;
            let y = chunks[0].y + 1 + row as u16;
            if x < chunks[0].right().saturating_sub(1) && y < chunks[0].bottom().saturating_sub(1) {
                frame.set_cursor_position((x, y));
            }
        }
    }
}

/// Row and column of the cursor inside the buffer's text.
pub fn cursor_offset(input: &TextInput) -> (usize, usize) {
    let before = &input.as_str()[..input.cursor_pos()];
    let row = before.matches('\n').count();
    let column = before
        .rsplit('\n')
        .next()
        .map(|line| line.chars().count())
        .unwrap_or(0);
    (row, column)
}
