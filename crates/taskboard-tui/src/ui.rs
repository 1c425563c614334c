use crate::app::{App, Focus};
use crate::components::*;
use crate::hit_map::region;
use crate::theme::*;
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use taskboard_core::FormField;
use taskboard_domain::board_list::delete_confirmation;
use taskboard_domain::board_view::ARCHIVE_CONFIRM;
use taskboard_domain::{
    format_relative, AuthFormKind, BoardFormFocus, ColumnRect, KanbanBoardState, Notice, Region,
    Screen, Task, TaskFormFocus, TaskFormMode, TaskId,
};

const CARD_HEIGHT: u16 = 4;
const DESCRIPTION_PREVIEW_LINES: usize = 6;

pub fn render(app: &mut App, frame: &mut Frame) {
    app.hit_map.clear();
    match app.screen() {
        Screen::Login | Screen::Register | Screen::ForgotPassword | Screen::ResetPassword { .. } => {
            render_auth(app, frame)
        }
        Screen::Dashboard => render_workspace(app, frame, "Dashboard"),
        Screen::AdminDashboard => render_workspace(app, frame, "Admin dashboard"),
        Screen::UserDashboard => render_workspace(app, frame, "User dashboard"),
        Screen::Home => {}
        Screen::NotFound(path) => render_not_found(frame, &path),
    }
}

fn render_not_found(frame: &mut Frame, path: &str) {
    let area = centered_rect(50, 30, frame.area());
    let text = vec![
        Line::from(Span::styled("404", bold_highlight())),
        Line::from(format!("Page {path} not found.")),
        Line::from(""),
        Line::from(Span::styled("Enter: go home   q: quit", label_text())),
    ];
    frame.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

// -- authentication screens --

fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::Username => "Username",
        FormField::Email => "Email",
        FormField::Password => "Password",
        FormField::ConfirmPassword => "Confirm password",
        _ => field.label(),
    }
}

fn render_auth(app: &App, frame: &mut Frame) {
    let Some(form) = app.auth_form.as_ref() else {
        return;
    };
    let area = centered_rect(60, 80, frame.area());
    let block = Block::default()
        .title(format!(" {} ", form.kind.title()))
        .borders(Borders::ALL)
        .border_style(focused_border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let field_count = form.fields().count();
    let mut constraints: Vec<Constraint> = (0..field_count).map(|_| Constraint::Length(4)).collect();
    constraints.extend([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Min(0),
    ]);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(inner);

    for (index, (field, input)) in form.fields().enumerate() {
        TextField::new(field_label(field), input)
            .focused(index == form.focus)
            .masked(matches!(
                field,
                FormField::Password | FormField::ConfirmPassword
            ))
            .error(form.errors.get(field))
            .render(frame, chunks[index]);
    }

    if let Some(strength) = form.strength() {
        let line = Line::from(vec![
            Span::styled("Strength: ", label_text()),
            Span::styled(strength.describe(), strength_style(strength)),
        ]);
        frame.render_widget(Paragraph::new(line), chunks[field_count]);
    }

    let notice = app
        .auth_notice
        .clone()
        .or_else(|| form.errors.get(FormField::Token).map(Notice::error));
    if form.submitting {
        frame.render_widget(
            Paragraph::new("Please wait...").style(label_text()),
            chunks[field_count + 1],
        );
    } else if let Some(notice) = notice {
        render_notice(frame, chunks[field_count + 1], &notice);
    }

    let help = match form.kind {
        AuthFormKind::Login => "Enter: sign in   Tab: next field   Ctrl-R: register   Ctrl-F: forgot password",
        AuthFormKind::Register => "Enter: create account   Tab: next field   Esc: back to sign in",
        AuthFormKind::ForgotPassword => "Enter: send reset link   Esc: back to sign in",
        AuthFormKind::ResetPassword => "Enter: reset password   Tab: next field   Esc: back to sign in",
    };
    frame.render_widget(
        Paragraph::new(help).style(label_text()).wrap(Wrap { trim: true }),
        chunks[field_count + 2],
    );
}

fn render_notice(frame: &mut Frame, area: Rect, notice: &Notice) {
    frame.render_widget(
        Paragraph::new(notice.message())
            .style(notice_style(notice))
            .wrap(Wrap { trim: true }),
        area,
    );
}

// -- workspace --

fn render_workspace(app: &mut App, frame: &mut Frame, title: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(app, frame, chunks[0], title);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
        .split(chunks[1]);
    render_board_list(app, frame, body[0]);
    render_kanban(app, frame, body[1]);
    render_footer(app, frame, chunks[2]);

    render_board_popups(app, frame);
    render_card_popups(app, frame);
    render_archived_popup(app, frame);
    if app.bell.is_open() {
        render_notification_dropdown(app, frame, chunks[1]);
    }
}

fn render_header(app: &mut App, frame: &mut Frame, area: Rect, title: &str) {
    let user = app
        .session
        .current()
        .map(|user| format!("{} ({})", user.username, user.role))
        .unwrap_or_default();
    let overall = app
        .boards
        .as_ref()
        .map(|boards| boards.overall())
        .unwrap_or_default();

    let bell_text = match app.bell.badge() {
        Some(badge) => format!(" Notifications {badge} "),
        None => " Notifications ".to_string(),
    };
    let bell_width = (bell_text.chars().count() as u16).min(area.width);
    let bell_area = Rect {
        x: area.right().saturating_sub(bell_width),
        y: area.y,
        width: bell_width,
        height: 1,
    };
    app.hit_map.bell = Some(region(bell_area));

    let left = Line::from(vec![
        Span::styled(" Taskboard ", bold_highlight()),
        Span::styled(format!("{title} "), normal_text()),
        Span::styled(format!("{user}  "), label_text()),
        Span::styled(
            format!("{}% of {} tasks done", overall.percentage, overall.total),
            label_text(),
        ),
    ]);
    frame.render_widget(Paragraph::new(left), area);

    let bell_style = if app.bell.unread_count() > 0 {
        badge(app.bell.is_pulsing(Utc::now()))
    } else if app.bell.is_open() {
        active_item()
    } else {
        normal_text()
    };
    frame.render_widget(
        Paragraph::new(Span::styled(bell_text, bell_style)),
        bell_area,
    );
}

fn render_board_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Boards && !app.has_modal();
    let Some(boards) = app.boards.as_ref() else {
        return;
    };

    let mut title = " Boards ".to_string();
    if boards.in_flight() {
        title.push_str("(refreshing) ");
    }
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            focused_border()
        } else {
            unfocused_border()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if boards.boards().is_empty() {
        frame.render_widget(
            Paragraph::new("No boards yet").style(label_text()),
            inner,
        );
        return;
    }

    let footer_height = u16::from(boards.last_refresh.is_some());
    let list_bottom = inner.bottom().saturating_sub(footer_height);
    let mut y = inner.y;
    for (index, summary) in boards.boards().iter().enumerate() {
        if y + 2 > list_bottom {
            break;
        }
        let item = Rect {
            x: inner.x,
            y,
            width: inner.width,
            height: 2,
        };
        let selected = index == boards.selected;
        let name_style = if selected {
            bold_highlight()
        } else {
            normal_text()
        };
        let lines = vec![
            Line::from(Span::styled(summary.board.name.clone(), name_style)),
            Line::from(Span::styled(
                format!(
                    "  {}% · {}/{} done",
                    summary.stats.percentage, summary.stats.completed, summary.stats.total
                ),
                label_text(),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).style(selected_item(selected && focused)),
            item,
        );
        app.hit_map.boards.push((region(item), summary.board.id));
        y += 2;
    }

    if let Some(refreshed) = boards.last_refresh {
        let footer = Rect {
            x: inner.x,
            y: inner.bottom().saturating_sub(1),
            width: inner.width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(format!("Updated {}", refreshed.format("%H:%M:%S"))).style(label_text()),
            footer,
        );
    }
}

fn render_kanban(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Board && !app.has_modal();
    let searching = app.searching;
    let Some(board) = app.kanban.as_ref() else {
        let block = Block::default()
            .title(" Board ")
            .borders(Borders::ALL)
            .border_style(unfocused_border());
        frame.render_widget(
            Paragraph::new("Select a board and press Enter")
                .style(label_text())
                .block(block),
            area,
        );
        return;
    };

    let mut title = vec![Span::styled(
        format!(" {} ", board.board.name),
        bold_highlight(),
    )];
    if !board.can_edit() {
        title.push(Span::styled("(read only) ", label_text()));
    }
    let query_offset: usize = title.iter().map(|span| span.content.chars().count()).sum::<usize>() + 8;
    if searching || !board.query.is_empty() {
        title.push(Span::styled(
            format!("search: {} ", board.query.as_str()),
            highlight_text(),
        ));
    }
    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(if focused {
            focused_border()
        } else {
            unfocused_border()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if searching {
        let x = area.x + 1 + (query_offset + board.query.cursor_column()) as u16;
        if x < area.right() {
            frame.set_cursor_position((x, area.y));
        }
    }

    if board.loading {
        frame.render_widget(Paragraph::new("Loading tasks...").style(label_text()), inner);
        return;
    }
    if board.board.columns.is_empty() {
        frame.render_widget(Paragraph::new("This board has no columns").style(label_text()), inner);
        return;
    }

    let count = board.board.columns.len() as u32;
    let column_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(board.board.columns.iter().map(|_| Constraint::Ratio(1, count)))
        .split(inner);

    let mut cards = Vec::new();
    let mut columns = Vec::new();
    for (index, (column, column_area)) in board.board.columns.iter().zip(column_areas.iter()).enumerate() {
        columns.push(ColumnRect::new(column.clone(), region(*column_area)));
        render_column(
            frame,
            board,
            index,
            column,
            *column_area,
            focused,
            &mut cards,
        );
    }
    app.hit_map.columns = columns;
    app.hit_map.cards = cards;
}

fn render_column(
    frame: &mut Frame,
    board: &KanbanBoardState,
    index: usize,
    column: &str,
    area: Rect,
    focused: bool,
    cards: &mut Vec<(Region, TaskId)>,
) {
    let tasks = board.visible_tasks(column);
    let hovered = board.drag.hovered_column() == Some(column);
    let border = if hovered {
        drop_target_border()
    } else if focused && index == board.selected_column {
        focused_border()
    } else {
        unfocused_border()
    };
    let block = Block::default()
        .title(format!(" {} ({}) ", column, tasks.len()))
        .borders(Borders::ALL)
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let dragged = board.drag.dragged().map(|task| task.id);
    let mut y = inner.y;
    for (row, task) in tasks.iter().enumerate() {
        let expanded = board.expanded == Some(task.id);
        let height = card_height(task, expanded);
        if y + height > inner.bottom() {
            let hidden = tasks.len() - row;
            if y < inner.bottom() {
                frame.render_widget(
                    Paragraph::new(format!("+{hidden} more")).style(label_text()),
                    Rect { x: inner.x, y, width: inner.width, height: 1 },
                );
            }
            break;
        }
        let card = Rect {
            x: inner.x,
            y,
            width: inner.width,
            height,
        };
        let selected = focused && index == board.selected_column && row == board.selected_row;
        render_card(frame, board, task, card, selected, dragged == Some(task.id), expanded);
        cards.push((region(card), task.id));
        y += height;
    }
}

fn card_height(task: &Task, expanded: bool) -> u16 {
    if !expanded {
        return CARD_HEIGHT;
    }
    let description = task
        .description_text()
        .lines()
        .count()
        .clamp(1, DESCRIPTION_PREVIEW_LINES) as u16;
    CARD_HEIGHT + description + 2
}

fn render_card(
    frame: &mut Frame,
    board: &KanbanBoardState,
    task: &Task,
    area: Rect,
    selected: bool,
    dragged: bool,
    expanded: bool,
) {
    let border = if dragged {
        dragged_card()
    } else if selected {
        focused_border()
    } else {
        unfocused_border()
    };
    let mut title = format!(" #{} ", task.id);
    if board.moving == Some(task.id) {
        title.push_str("saving... ");
    }
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border);

    let assignee = task.assigned_to.as_deref().unwrap_or("Unassigned");
    let title_style = if dragged {
        dragged_card()
    } else {
        normal_text().add_modifier(Modifier::BOLD)
    };
    let mut lines = vec![
        Line::from(Span::styled(task.title.clone(), title_style)),
        Line::from(vec![
            Span::styled(task.priority.as_str(), priority_style(task.priority)),
            Span::styled(format!(" · {assignee}"), label_text()),
        ]),
    ];
    if expanded {
        lines.push(Line::from(""));
        let description = task.description_text();
        if description.is_empty() {
            lines.push(Line::from(Span::styled("No description", label_text())));
        } else {
            lines.extend(
                description
                    .lines()
                    .take(DESCRIPTION_PREVIEW_LINES)
                    .map(|line| Line::from(line.to_string())),
            );
        }
        let created = task
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        lines.push(Line::from(Span::styled(
            format!("Created {created}"),
            label_text(),
        )));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn current_notice(app: &App) -> Option<&Notice> {
    if let Some(notice) = app.archived.as_ref().and_then(|view| view.notice.as_ref()) {
        return Some(notice);
    }
    let board_notice = app.kanban.as_ref().and_then(|board| board.notice.as_ref());
    let list_notice = app.boards.as_ref().and_then(|boards| boards.notice.as_ref());
    match app.focus {
        Focus::Board => board_notice.or(list_notice),
        Focus::Boards => list_notice.or(board_notice),
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::TOP);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    if let Some(notice) = current_notice(app) {
        render_notice(frame, chunks[0], notice);
    } else if let Some(error) = app.bell.last_error.as_deref() {
        frame.render_widget(Paragraph::new(error).style(error_text()), chunks[0]);
    }

    let drag_active = app.kanban.as_ref().is_some_and(|board| board.drag.is_active());
    let help = if drag_active {
        "h/l: choose column   Enter: drop   Esc: cancel"
    } else if app.searching {
        "type to filter   Enter: keep   Esc: clear"
    } else {
        match app.focus {
            Focus::Boards => {
                "j/k: select  Enter: open  n: new  d: delete  r: refresh  A: archived  b: notifications  Tab: board  L: logout  q: quit"
            }
            Focus::Board => {
                "h/j/k/l: move  Enter: details  /: search  n: new  e: edit  a: archive  m: move card  A: archived  r: reload  Tab: boards  q: quit"
            }
        }
    };
    frame.render_widget(Paragraph::new(help).style(label_text()), chunks[1]);
}

// -- overlays --

fn render_board_popups(app: &App, frame: &mut Frame) {
    let Some(boards) = app.boards.as_ref() else {
        return;
    };
    if let Some(id) = boards.confirm_delete {
        let name = boards.board(id).map(|b| b.name.as_str()).unwrap_or_default();
        render_confirm_popup(frame, " Delete board ", &delete_confirmation(name));
        return;
    }
    let Some(form) = boards.form.as_ref() else {
        return;
    };

    let inner = render_popup_with_block(frame, " New board ", 60, 90);
    let mut constraints = vec![Constraint::Length(4), Constraint::Length(6), Constraint::Length(1)];
    constraints.extend(form.columns.iter().map(|_| Constraint::Length(3)));
    constraints.extend([Constraint::Length(1), Constraint::Min(1)]);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(inner);

    TextField::new("Name", &form.name)
        .focused(form.focus == BoardFormFocus::Name)
        .error(form.errors.get(FormField::Name))
        .render(frame, chunks[0]);
    TextField::new("Description", &form.description)
        .focused(form.focus == BoardFormFocus::Description)
        .error(form.errors.get(FormField::Description))
        .render(frame, chunks[1]);
    frame.render_widget(Paragraph::new("Columns").style(highlight_text()), chunks[2]);

    for (index, column) in form.columns.iter().enumerate() {
        let focused = form.focus == BoardFormFocus::Column(index);
        let area = chunks[3 + index];
        let label = format!("{}", index + 1);
        let input = Paragraph::new(column.as_str()).block(
            Block::default()
                .title(label)
                .borders(Borders::ALL)
                .border_style(if focused {
                    focused_border()
                } else {
                    unfocused_border()
                }),
        );
        frame.render_widget(input, area);
        if focused {
            let x = area.x + 1 + column.cursor_column() as u16;
            if x < area.right().saturating_sub(1) {
                frame.set_cursor_position((x, area.y + 1));
            }
        }
    }

    let status_row = chunks[3 + form.columns.len()];
    if let Some(error) = form.errors.get(FormField::Columns) {
        frame.render_widget(Paragraph::new(error).style(error_text()), status_row);
    } else if form.submitting {
        frame.render_widget(Paragraph::new("Creating...").style(label_text()), status_row);
    }
    frame.render_widget(
        Paragraph::new("Tab: next field  Enter: create  Ctrl-N: add column  Ctrl-D: remove column  Esc: cancel")
            .style(label_text())
            .wrap(Wrap { trim: true }),
        chunks[4 + form.columns.len()],
    );
}

fn render_card_popups(app: &App, frame: &mut Frame) {
    let Some(board) = app.kanban.as_ref() else {
        return;
    };
    if board.confirm_archive.is_some() {
        render_confirm_popup(frame, " Archive task ", ARCHIVE_CONFIRM);
        return;
    }
    let Some(form) = board.form.as_ref() else {
        return;
    };

    let title = match form.mode {
        TaskFormMode::Create => format!(" New task in {} ", form.status),
        TaskFormMode::Edit(id) => format!(" Edit task #{id} "),
    };
    let inner = render_popup_with_block(frame, &title, 70, 90);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    TextField::new("Title", &form.title)
        .focused(form.focus == TaskFormFocus::Title)
        .error(form.errors.get(FormField::Title))
        .render(frame, chunks[0]);
    TextField::new("Description", &form.description)
        .focused(form.focus == TaskFormFocus::Description)
        .error(form.errors.get(FormField::Description))
        .render(frame, chunks[1]);
    frame.render_widget(
        Paragraph::new(format!("Words: {}/1000", form.description.word_count())).style(label_text()),
        chunks[2],
    );

    let choice = |label: &str, value: Span<'static>, focus: TaskFormFocus, field: FormField| {
        let marker = if form.focus == focus { "> " } else { "  " };
        let mut lines = vec![Line::from(vec![
            Span::styled(format!("{marker}{label}: "), label_text()),
            value,
        ])];
        if let Some(error) = form.errors.get(field) {
            lines.push(Line::from(Span::styled(error.to_string(), error_text())));
        }
        Paragraph::new(lines)
    };
    frame.render_widget(
        choice(
            "Priority",
            Span::styled(form.priority.as_str(), priority_style(form.priority)),
            TaskFormFocus::Priority,
            FormField::Priority,
        ),
        chunks[3],
    );
    frame.render_widget(
        choice(
            "Assigned to",
            Span::styled(
                form.assigned_to.clone().unwrap_or_else(|| "Unassigned".to_string()),
                normal_text(),
            ),
            TaskFormFocus::AssignedTo,
            FormField::AssignedTo,
        ),
        chunks[4],
    );

    if let Some(error) = form.errors.get(FormField::Status) {
        frame.render_widget(Paragraph::new(error).style(error_text()), chunks[5]);
    } else if form.submitting {
        frame.render_widget(Paragraph::new("Saving...").style(label_text()), chunks[5]);
    }
    frame.render_widget(
        Paragraph::new("Tab: next field  Enter: save  Space: change choice  Ctrl-S: save  Esc: cancel")
            .style(label_text()),
        chunks[6],
    );
}

fn render_archived_popup(app: &App, frame: &mut Frame) {
    let Some(view) = app.archived.as_ref() else {
        return;
    };
    let inner = render_popup_with_block(frame, " Archived tasks ", 70, 70);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let lines: Vec<Line> = if view.loading {
        vec![Line::from(Span::styled("Loading...", label_text()))]
    } else if view.tasks().is_empty() {
        vec![Line::from(Span::styled("No archived tasks", label_text()))]
    } else {
        view.tasks()
            .iter()
            .enumerate()
            .map(|(index, task)| {
                let mut spans = vec![
                    Span::styled(task.title.clone(), normal_text()),
                    Span::styled(format!("  {} · board {}", task.status, task.board_id), label_text()),
                ];
                if view.restoring == Some(task.id) {
                    spans.push(Span::styled("  restoring...", highlight_text()));
                }
                Line::from(spans).style(selected_item(index == view.selected))
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    if let Some(notice) = view.notice.as_ref() {
        render_notice(frame, chunks[1], notice);
    }
    frame.render_widget(
        Paragraph::new("j/k: select  Enter: restore  Esc: close").style(label_text()),
        chunks[2],
    );
}

fn render_notification_dropdown(app: &mut App, frame: &mut Frame, body: Rect) {
    let width = body.width.min(56);
    let wanted = app.bell.items().len().max(1) as u16 + 4;
    let height = wanted.min(body.height);
    let area = Rect {
        x: body.right().saturating_sub(width),
        y: body.y,
        width,
        height,
    };
    app.hit_map.dropdown = Some(region(area));

    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" Notifications ({} unread) ", app.bell.unread_count()))
        .borders(Borders::ALL)
        .border_style(focused_border())
        .style(popup_bg());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let list_height = inner.height.saturating_sub(2);
    let now = Utc::now();
    if app.bell.items().is_empty() {
        frame.render_widget(
            Paragraph::new("No notifications").style(label_text()),
            inner,
        );
    }
    for (index, item) in app.bell.items().iter().enumerate().take(list_height as usize) {
        let row = Rect {
            x: inner.x,
            y: inner.y + index as u16,
            width: inner.width,
            height: 1,
        };
        let marker = if item.read { "  " } else { "● " };
        let text_style = if item.read { done_text() } else { unread_text() };
        let line = Line::from(vec![
            Span::styled(marker, highlight_text()),
            Span::styled(format!("[{}] ", item.kind.label()), label_text()),
            Span::styled(item.message.clone(), text_style),
            Span::styled(format!("  {}", format_relative(item.created_at, now)), label_text()),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(selected_item(index == app.bell.selected)),
            row,
        );
        app.hit_map.notifications.push((region(row), item.id));
    }

    let footer = Rect {
        x: inner.x,
        y: inner.bottom().saturating_sub(1),
        width: inner.width,
        height: 1,
    };
    let footer_text = match app.bell.last_error.as_deref() {
        Some(error) => Paragraph::new(error.to_string()).style(error_text()),
        None => Paragraph::new("Enter: mark read  R: mark all read  Esc: close").style(label_text()),
    };
    frame.render_widget(footer_text, footer);
}
