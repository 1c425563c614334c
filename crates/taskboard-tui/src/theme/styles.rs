use super::colors::*;
use ratatui::style::{Modifier, Style};
use taskboard_domain::{Notice, PasswordStrength, Priority};

pub fn focused_border() -> Style {
    Style::default().fg(FOCUSED_BORDER)
}

pub fn unfocused_border() -> Style {
    Style::default().fg(UNFOCUSED_BORDER)
}

/// Border of the column a dragged card would land in.
pub fn drop_target_border() -> Style {
    Style::default()
        .fg(DROP_TARGET_BORDER)
        .add_modifier(Modifier::BOLD)
}

pub fn selected_item(focused: bool) -> Style {
    if focused {
        Style::default().bg(SELECTED_BG)
    } else {
        Style::default()
    }
}

/// The card being dragged stays in place, dimmed.
pub fn dragged_card() -> Style {
    Style::default()
        .fg(DONE_TEXT)
        .add_modifier(Modifier::DIM | Modifier::ITALIC)
}

pub fn active_item() -> Style {
    Style::default()
        .fg(ACTIVE_ITEM)
        .add_modifier(Modifier::BOLD)
}

pub fn done_text() -> Style {
    Style::default().fg(DONE_TEXT)
}

pub fn normal_text() -> Style {
    Style::default().fg(NORMAL_TEXT)
}

pub fn label_text() -> Style {
    Style::default().fg(LABEL_TEXT)
}

pub fn highlight_text() -> Style {
    Style::default().fg(HIGHLIGHT_TEXT)
}

pub fn bold_highlight() -> Style {
    Style::default()
        .fg(HIGHLIGHT_TEXT)
        .add_modifier(Modifier::BOLD)
}

pub fn error_text() -> Style {
    Style::default().fg(ERROR_COLOR)
}

pub fn priority_style(priority: Priority) -> Style {
    let color = match priority {
        Priority::High => PRIORITY_HIGH,
        Priority::Medium => PRIORITY_MEDIUM,
        Priority::Low => PRIORITY_LOW,
    };
    Style::default().fg(color)
}

pub fn strength_style(strength: PasswordStrength) -> Style {
    let color = match strength {
        PasswordStrength::Weak => STRENGTH_WEAK,
        PasswordStrength::Medium => STRENGTH_MEDIUM,
        PasswordStrength::Strong => STRENGTH_STRONG,
    };
    Style::default().fg(color)
}

pub fn notice_style(notice: &Notice) -> Style {
    if notice.is_error() {
        Style::default().fg(ERROR_COLOR)
    } else {
        Style::default().fg(INFO_COLOR)
    }
}

pub fn badge(pulsing: bool) -> Style {
    let style = Style::default()
        .bg(BADGE_BG)
        .fg(NORMAL_TEXT)
        .add_modifier(Modifier::BOLD);
    if pulsing {
        style.add_modifier(Modifier::RAPID_BLINK | Modifier::REVERSED)
    } else {
        style
    }
}

pub fn unread_text() -> Style {
    Style::default()
        .fg(NORMAL_TEXT)
        .add_modifier(Modifier::BOLD)
}

pub fn popup_bg() -> Style {
    Style::default().bg(POPUP_BG)
}
