use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, Terminal};
use taskboard_client::{AuthSession, InMemoryBackend, MemoryStorage, Services};
use taskboard_core::{AppConfig, FormField, TextInput};
use taskboard_domain::{NotificationKind, Region, Role, Route, Screen, User};
use taskboard_tui::{ui, App, AppEvent, Connector, Event, EventHandler, Focus};

struct Harness {
    backend: Arc<InMemoryBackend>,
    app: App,
    events: EventHandler,
    terminal: Terminal<TestBackend>,
}

impl Harness {
    fn new(backend: Arc<InMemoryBackend>, signed_in: Option<(&str, Role)>, route: Route) -> Self {
        let mut session = AuthSession::rehydrate(Box::new(MemoryStorage::new()));
        if let Some((username, role)) = signed_in {
            backend.sign_in_as(username);
            session
                .login(User {
                    username: username.to_string(),
                    role,
                    email: format!("{username}@example.com"),
                    token: format!("memory-token-{username}"),
                })
                .unwrap();
        }
        let shared = backend.clone();
        let connector: Connector = Arc::new(move |_token| Ok(Services::in_memory(shared.clone())));
        let events = EventHandler::detached();
        let mut app = App::new(AppConfig::default(), session, connector, route, events.sender())
            .unwrap();
        app.start();
        Self {
            backend,
            app,
            events,
            terminal: Terminal::new(TestBackend::new(120, 40)).unwrap(),
        }
    }

    /// Deliver queued events until `done` holds.
    async fn pump_until(&mut self, done: impl Fn(&App) -> bool) {
        let result = tokio::time::timeout(Duration::from_secs(2), async {
            while !done(&self.app) {
                match self.events.next().await {
                    Some(event) => self.app.handle_event(event),
                    None => break,
                }
            }
        })
        .await;
        assert!(result.is_ok(), "condition not reached in time");
    }

    /// Deliver whatever arrives within a short window.
    async fn settle(&mut self) {
        while let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_millis(100), self.events.next()).await
        {
            self.app.handle_event(event);
        }
    }

    fn key(&mut self, code: KeyCode) {
        self.app
            .handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn ctrl(&mut self, c: char) {
        self.app
            .handle_event(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)));
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.key(KeyCode::Char(c));
        }
    }

    fn mouse(&mut self, kind: MouseEventKind, x: u16, y: u16) {
        self.app.handle_event(Event::Mouse(MouseEvent {
            kind,
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        }));
    }

    fn render(&mut self) {
        let app = &mut self.app;
        self.terminal.draw(|frame| ui::render(app, frame)).unwrap();
    }

    fn screen_text(&self) -> String {
        let buffer = self.terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn task_status(&self, title: &str) -> Option<String> {
        self.app
            .kanban
            .as_ref()?
            .tasks()
            .iter()
            .find(|task| task.title == title)
            .map(|task| task.status.clone())
    }
}

fn center(area: Region) -> (u16, u16) {
    (area.x + area.width / 2, area.y + area.height / 2)
}

fn seeded() -> Arc<InMemoryBackend> {
    let backend = Arc::new(InMemoryBackend::new());
    backend.seed_account("admin", "admin@example.com", "password1", Role::Admin);
    backend.seed_account("ann", "ann@example.com", "password1", Role::User);
    backend
}

fn boards_loaded(app: &App) -> bool {
    app.boards.as_ref().is_some_and(|b| b.last_refresh.is_some())
}

fn board_ready(app: &App) -> bool {
    app.kanban.as_ref().is_some_and(|k| !k.loading)
}

#[tokio::test]
async fn test_protected_route_redirects_to_login() {
    let h = Harness::new(seeded(), None, Route::Kanban);
    assert_eq!(h.app.route, Route::Login);
    assert!(h.app.auth_form.is_some());
    assert!(h.app.boards.is_none());
}

#[tokio::test]
async fn test_sign_in_through_login_form() {
    let mut h = Harness::new(seeded(), None, Route::Login);
    h.type_text("admin");
    h.key(KeyCode::Tab);
    h.type_text("password1");
    h.key(KeyCode::Enter);

    h.pump_until(|app| app.session.is_authenticated()).await;
    assert_eq!(h.app.route, Route::Dashboard);
    assert_eq!(h.app.session.token(), Some("memory-token-admin"));
    assert_eq!(h.app.screen(), Screen::Dashboard);
    h.pump_until(boards_loaded).await;
}

#[tokio::test]
async fn test_failed_sign_in_keeps_login_screen() {
    let mut h = Harness::new(seeded(), None, Route::Login);
    h.type_text("admin");
    h.key(KeyCode::Tab);
    h.type_text("wrong-password");
    h.key(KeyCode::Enter);

    h.pump_until(|app| app.auth_notice.is_some()).await;
    assert!(!h.app.session.is_authenticated());
    assert_eq!(h.app.route, Route::Login);
    assert!(h.app.auth_notice.as_ref().unwrap().is_error());
}

#[tokio::test]
async fn test_create_board_add_task_and_move_with_keyboard() {
    let mut h = Harness::new(seeded(), Some(("admin", Role::Admin)), Route::Dashboard);
    h.pump_until(boards_loaded).await;

    h.key(KeyCode::Char('n'));
    assert!(h.app.boards.as_ref().unwrap().form.is_some());
    h.type_text("Sprint 1");
    h.key(KeyCode::Tab);
    h.type_text("First quarter work");
    h.ctrl('s');
    h.pump_until(|app| app.boards.as_ref().is_some_and(|b| b.boards().len() == 1))
        .await;
    assert_eq!(h.backend.stored_boards()[0].name, "Sprint 1");

    h.key(KeyCode::Enter);
    assert_eq!(h.app.focus, Focus::Board);
    h.pump_until(board_ready).await;

    h.key(KeyCode::Char('n'));
    h.type_text("Fix bug");
    h.ctrl('s');
    h.pump_until(|app| app.kanban.as_ref().is_some_and(|k| k.tasks().len() == 1))
        .await;
    assert_eq!(h.task_status("Fix bug").as_deref(), Some("To Do"));

    h.key(KeyCode::Char('m'));
    h.key(KeyCode::Char('l'));
    h.key(KeyCode::Enter);
    h.pump_until(|app| {
        app.kanban
            .as_ref()
            .is_some_and(|k| k.moving.is_none() && k.tasks()[0].status == "In Progress")
    })
    .await;

    let board_id = h.backend.stored_boards()[0].id;
    assert_eq!(h.backend.stored_tasks(board_id)[0].status, "In Progress");
}

#[tokio::test]
async fn test_drop_on_same_column_sends_nothing() {
    let backend = seeded();
    let board = backend.seed_board("Sprint 1", &["To Do", "Doing", "Done"]);
    backend.seed_task(board.id, "Fix bug", "To Do");
    let mut h = Harness::new(backend, Some(("admin", Role::Admin)), Route::Dashboard);
    h.pump_until(boards_loaded).await;
    h.key(KeyCode::Enter);
    h.pump_until(board_ready).await;
    h.backend.clear_requests();

    h.key(KeyCode::Char('m'));
    h.key(KeyCode::Enter);
    h.settle().await;

    assert!(!h.backend.requests().iter().any(|r| r.starts_with("PUT")));
    assert_eq!(h.task_status("Fix bug").as_deref(), Some("To Do"));
}

#[tokio::test]
async fn test_mouse_drag_moves_card_between_columns() {
    let backend = seeded();
    let board = backend.seed_board("Sprint 1", &["To Do", "Doing", "Done"]);
    backend.seed_task(board.id, "Fix bug", "To Do");
    let mut h = Harness::new(backend, Some(("admin", Role::Admin)), Route::Dashboard);
    h.pump_until(boards_loaded).await;
    h.key(KeyCode::Enter);
    h.pump_until(board_ready).await;

    h.render();
    let (card, _) = h.app.hit_map.cards[0];
    let done = h
        .app
        .hit_map
        .columns
        .iter()
        .find(|rect| rect.column == "Done")
        .map(|rect| rect.area)
        .unwrap();
    let (cx, cy) = center(card);
    let (dx, dy) = center(done);

    h.mouse(MouseEventKind::Down(MouseButton::Left), cx, cy);
    h.mouse(MouseEventKind::Drag(MouseButton::Left), dx, dy);
    h.mouse(MouseEventKind::Up(MouseButton::Left), dx, dy);

    h.pump_until(|app| app.kanban.as_ref().is_some_and(|k| k.moving.is_none()))
        .await;
    assert_eq!(h.task_status("Fix bug").as_deref(), Some("Done"));
    assert_eq!(h.backend.stored_tasks(board.id)[0].status, "Done");
}

#[tokio::test]
async fn test_click_without_movement_expands_card() {
    let backend = seeded();
    let board = backend.seed_board("Sprint 1", &["To Do", "Done"]);
    let task = backend.seed_task(board.id, "Fix bug", "To Do");
    let mut h = Harness::new(backend, Some(("admin", Role::Admin)), Route::Dashboard);
    h.pump_until(boards_loaded).await;
    h.key(KeyCode::Enter);
    h.pump_until(board_ready).await;

    h.render();
    let (x, y) = center(h.app.hit_map.cards[0].0);
    h.mouse(MouseEventKind::Down(MouseButton::Left), x, y);
    h.mouse(MouseEventKind::Up(MouseButton::Left), x, y);

    assert_eq!(h.app.kanban.as_ref().unwrap().expanded, Some(task.id));
}

#[tokio::test]
async fn test_regular_user_cannot_drag_cards() {
    let backend = seeded();
    let board = backend.seed_board("Sprint 1", &["To Do", "Done"]);
    backend.seed_task(board.id, "Fix bug", "To Do");
    let mut h = Harness::new(backend, Some(("ann", Role::User)), Route::Dashboard);
    h.pump_until(boards_loaded).await;
    h.key(KeyCode::Enter);
    assert_eq!(h.app.screen(), Screen::UserDashboard);
    h.pump_until(board_ready).await;
    h.backend.clear_requests();

    h.render();
    let (cx, cy) = center(h.app.hit_map.cards[0].0);
    let done = h.app.hit_map.columns[1].area;
    let (dx, dy) = center(done);
    h.mouse(MouseEventKind::Down(MouseButton::Left), cx, cy);
    h.mouse(MouseEventKind::Drag(MouseButton::Left), dx, dy);
    h.mouse(MouseEventKind::Up(MouseButton::Left), dx, dy);
    h.settle().await;

    let kanban = h.app.kanban.as_ref().unwrap();
    assert!(kanban.notice.as_ref().is_some_and(|n| n.is_error()));
    assert!(!kanban.drag.is_active());
    assert!(!h.backend.requests().iter().any(|r| r.starts_with("PUT")));
    assert_eq!(h.task_status("Fix bug").as_deref(), Some("To Do"));
}

#[tokio::test]
async fn test_regular_user_cannot_open_board_form() {
    let mut h = Harness::new(seeded(), Some(("ann", Role::User)), Route::Dashboard);
    h.pump_until(boards_loaded).await;

    h.key(KeyCode::Char('n'));

    let boards = h.app.boards.as_ref().unwrap();
    assert!(boards.form.is_none());
    assert!(boards.notice.as_ref().is_some_and(|n| n.is_error()));
}

#[tokio::test]
async fn test_overlong_description_is_not_sent() {
    let backend = seeded();
    backend.seed_board("Sprint 1", &["To Do", "Done"]);
    let mut h = Harness::new(backend, Some(("admin", Role::Admin)), Route::Dashboard);
    h.pump_until(boards_loaded).await;
    h.key(KeyCode::Enter);
    h.pump_until(board_ready).await;
    h.backend.clear_requests();

    h.key(KeyCode::Char('n'));
    h.type_text("Write docs");
    let words = vec!["word"; 1001].join(" ");
    h.app.kanban.as_mut().unwrap().form.as_mut().unwrap().description =
        TextInput::with_text(words);
    h.ctrl('s');
    h.settle().await;

    let form = h.app.kanban.as_ref().unwrap().form.as_ref().unwrap();
    assert!(form.errors.contains(FormField::Description));
    assert!(!form.submitting);
    assert!(!h.backend.requests().iter().any(|r| r == "POST /api/v1/tasks"));
}

#[tokio::test]
async fn test_archive_then_restore_from_archived_view() {
    let backend = seeded();
    let board = backend.seed_board("Sprint 1", &["To Do", "Done"]);
    backend.seed_task(board.id, "Old task", "Done");
    let mut h = Harness::new(backend, Some(("admin", Role::Admin)), Route::Dashboard);
    h.pump_until(boards_loaded).await;
    h.key(KeyCode::Enter);
    h.pump_until(board_ready).await;

    h.key(KeyCode::Char('l'));
    h.key(KeyCode::Char('a'));
    assert!(h.app.kanban.as_ref().unwrap().confirm_archive.is_some());
    h.key(KeyCode::Char('y'));
    h.pump_until(|app| app.kanban.as_ref().is_some_and(|k| k.tasks().is_empty()))
        .await;
    assert!(h.backend.stored_tasks(board.id)[0].archived);

    h.key(KeyCode::Char('A'));
    h.pump_until(|app| app.archived.as_ref().is_some_and(|a| !a.loading))
        .await;
    assert_eq!(h.app.archived.as_ref().unwrap().tasks().len(), 1);

    h.key(KeyCode::Enter);
    h.pump_until(|app| app.kanban.as_ref().is_some_and(|k| k.tasks().len() == 1))
        .await;
    assert!(!h.backend.stored_tasks(board.id)[0].archived);
    assert!(h.app.archived.as_ref().unwrap().tasks().is_empty());
}

#[tokio::test]
async fn test_regular_user_cannot_open_archived_view() {
    let mut h = Harness::new(seeded(), Some(("ann", Role::User)), Route::Dashboard);
    h.pump_until(boards_loaded).await;

    h.key(KeyCode::Char('A'));

    assert!(h.app.archived.is_none());
    assert!(h.app.boards.as_ref().unwrap().notice.is_some());
}

#[tokio::test]
async fn test_bell_marks_all_notifications_read() {
    let backend = seeded();
    backend.seed_notification(NotificationKind::TaskCreated, "Task created", false, None);
    backend.seed_notification(NotificationKind::TaskAssigned, "Task assigned", false, None);
    let mut h = Harness::new(backend, Some(("admin", Role::Admin)), Route::Dashboard);
    h.pump_until(|app| app.bell.unread_count() == 2).await;

    h.key(KeyCode::Char('b'));
    assert!(h.app.bell.is_open());
    h.key(KeyCode::Char('R'));
    h.pump_until(|app| app.bell.unread_count() == 0).await;
    assert_eq!(h.app.bell.badge(), None);
}

#[tokio::test]
async fn test_click_outside_bell_closes_dropdown() {
    let backend = seeded();
    backend.seed_notification(NotificationKind::TaskUpdated, "Task updated", false, None);
    let mut h = Harness::new(backend, Some(("admin", Role::Admin)), Route::Dashboard);
    h.pump_until(|app| app.bell.unread_count() == 1).await;

    h.render();
    let (bx, by) = center(h.app.hit_map.bell.unwrap());
    h.mouse(MouseEventKind::Down(MouseButton::Left), bx, by);
    assert!(h.app.bell.is_open());

    h.render();
    assert!(h.app.hit_map.dropdown.is_some());
    h.mouse(MouseEventKind::Down(MouseButton::Left), 1, 38);
    assert!(!h.app.bell.is_open());
    assert_eq!(h.app.bell.unread_count(), 1);
}

#[tokio::test]
async fn test_logout_returns_to_login() {
    let mut h = Harness::new(seeded(), Some(("admin", Role::Admin)), Route::Dashboard);
    h.pump_until(boards_loaded).await;

    h.key(KeyCode::Char('L'));

    assert!(!h.app.session.is_authenticated());
    assert_eq!(h.app.route, Route::Login);
    assert!(h.app.boards.is_none());
}

#[tokio::test]
async fn test_unknown_route_renders_not_found() {
    let mut h = Harness::new(seeded(), None, Route::parse("/nowhere"));
    h.render();
    assert!(h.screen_text().contains("404"));

    h.key(KeyCode::Enter);
    assert_eq!(h.app.route, Route::Login);
}

#[tokio::test]
async fn test_kanban_render_records_drop_surfaces() {
    let backend = seeded();
    let board = backend.seed_board("Sprint 1", &["To Do", "Doing", "Done"]);
    backend.seed_task(board.id, "Fix bug", "Doing");
    let mut h = Harness::new(backend, Some(("admin", Role::Admin)), Route::Dashboard);
    h.pump_until(boards_loaded).await;
    h.key(KeyCode::Enter);
    h.pump_until(board_ready).await;

    h.render();
    let columns: Vec<_> = h.app.hit_map.columns.iter().map(|c| c.column.as_str()).collect();
    assert_eq!(columns, ["To Do", "Doing", "Done"]);
    assert_eq!(h.app.hit_map.cards.len(), 1);
    let text = h.screen_text();
    assert!(text.contains("Sprint 1"));
    assert!(text.contains("Fix bug"));
}

#[tokio::test]
async fn test_results_for_a_board_left_behind_are_dropped() {
    let backend = seeded();
    let sprint = backend.seed_board("Sprint 1", &["To Do", "Doing"]);
    let ops = backend.seed_board("Ops", &["Open", "Closed"]);
    let fix = backend.seed_task(sprint.id, "Fix bug", "To Do");
    let docs = backend.seed_task(sprint.id, "Write docs", "To Do");
    backend.seed_task(ops.id, "Patch", "Open");
    let mut h = Harness::new(backend, Some(("admin", Role::Admin)), Route::Dashboard);
    h.pump_until(boards_loaded).await;
    h.app.open_board(ops.clone());
    h.pump_until(board_ready).await;

    let mut moved = fix.clone();
    moved.status = "Doing".to_string();
    h.app.handle_app_event(AppEvent::TaskMoved {
        board_id: sprint.id,
        result: Ok(moved),
    });
    h.app.handle_app_event(AppEvent::TaskSaved {
        board_id: sprint.id,
        result: Ok(docs),
    });
    h.app.handle_app_event(AppEvent::TaskArchived {
        board_id: sprint.id,
        id: fix.id,
        result: Ok(()),
    });

    let open = h.app.kanban.as_ref().unwrap();
    assert_eq!(open.board.id, ops.id);
    let titles: Vec<&str> = open.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Patch"]);
    assert!(open.tasks().iter().all(|t| open.board.has_column(&t.status)));
    assert!(open.notice.is_none());
}
