use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::join;
use ratatui::{backend::CrosstermBackend, Terminal};
use taskboard_client::controllers::{archived, auth, board_list, kanban, notifications};
use taskboard_client::{resolve_role, AuthOutcome, AuthSession, Poller, Services};
use taskboard_core::{AppConfig, TaskboardError, TaskboardResult};
use taskboard_domain::{
    resolve, ArchiveScope, ArchivedTasksState, AuthForm, AuthFormKind, Board, BoardId,
    BoardListState, KanbanBoardState, Notice, NotificationFeed, NotificationId, PendingMove,
    RefreshTrigger, Route, Screen, TaskId, User,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::events::{AppEvent, Event, EventHandler};
use crate::hit_map::HitMap;
use crate::ui;

/// Builds the services for a session token. Called again after sign-in and sign-out.
pub type Connector = Arc<dyn Fn(Option<&str>) -> TaskboardResult<Services> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Boards,
    Board,
}

/// Left button held on a card. Becomes a drag once the pointer moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub task: TaskId,
    pub dragging: bool,
}

pub struct App {
    config: AppConfig,
    connector: Connector,
    services: Services,
    pub session: AuthSession,
    pub route: Route,
    pub auth_form: Option<AuthForm>,
    pub auth_notice: Option<Notice>,
    pub boards: Option<BoardListState>,
    pub kanban: Option<KanbanBoardState>,
    pub archived: Option<ArchivedTasksState>,
    pub bell: NotificationFeed,
    pub focus: Focus,
    pub searching: bool,
    pub hit_map: HitMap,
    pub press: Option<Press>,
    pollers: Vec<Poller>,
    tx: UnboundedSender<Event>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: AppConfig,
        session: AuthSession,
        connector: Connector,
        route: Route,
        tx: UnboundedSender<Event>,
    ) -> TaskboardResult<Self> {
        let services = connector(session.token())?;
        Ok(Self {
            config,
            connector,
            services,
            session,
            route,
            auth_form: None,
            auth_notice: None,
            boards: None,
            kanban: None,
            archived: None,
            bell: NotificationFeed::new(),
            focus: Focus::default(),
            searching: false,
            hit_map: HitMap::default(),
            press: None,
            pollers: Vec::new(),
            tx,
            should_quit: false,
        })
    }

    /// Enter the initial route. Must run inside the tokio runtime.
    pub fn start(&mut self) {
        self.navigate(self.route.clone());
    }

    pub fn screen(&self) -> Screen {
        resolve(&self.route, self.session.role())
    }

    pub fn is_workspace(&self) -> bool {
        matches!(
            self.screen(),
            Screen::Dashboard | Screen::AdminDashboard | Screen::UserDashboard
        )
    }

    /// A form, confirmation or overlay currently owns the keyboard.
    pub fn has_modal(&self) -> bool {
        self.archived.is_some()
            || self
                .boards
                .as_ref()
                .is_some_and(|b| b.form.is_some() || b.confirm_delete.is_some())
            || self
                .kanban
                .as_ref()
                .is_some_and(|k| k.form.is_some() || k.confirm_archive.is_some())
    }

    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(%route, "Navigating");
        self.route = route;
        match self.screen() {
            Screen::Home => {
                let next = if self.session.is_authenticated() {
                    Route::Dashboard
                } else {
                    Route::Login
                };
                self.navigate(next);
            }
            Screen::Login => {
                self.route = Route::Login;
                self.show_auth(AuthForm::new(AuthFormKind::Login));
            }
            Screen::Register => self.show_auth(AuthForm::new(AuthFormKind::Register)),
            Screen::ForgotPassword => self.show_auth(AuthForm::new(AuthFormKind::ForgotPassword)),
            Screen::ResetPassword { token } => self.show_auth(AuthForm::reset_password(token)),
            Screen::Dashboard => {
                self.route = Route::Dashboard;
                self.enter_workspace();
            }
            Screen::AdminDashboard | Screen::UserDashboard => self.enter_workspace(),
            Screen::NotFound(path) => tracing::warn!(%path, "Unknown route"),
        }
    }

    fn show_auth(&mut self, form: AuthForm) {
        self.leave_workspace();
        self.auth_form = Some(form);
    }

    fn enter_workspace(&mut self) {
        self.auth_form = None;
        if self.boards.is_some() {
            return;
        }
        let role = self.session.role().unwrap_or_default();
        self.boards = Some(BoardListState::new(role));
        self.bell = NotificationFeed::new();
        self.focus = Focus::Boards;

        let token = self.session.token().map(String::from);
        self.spawn(move |services| async move {
            AppEvent::RoleResolved(resolve_role(&services, token.as_deref()).await)
        });
        self.pollers = vec![
            self.poller(
                "boards",
                self.config.board_refresh_interval(),
                || AppEvent::PollBoards,
            ),
            self.poller(
                "notifications",
                self.config.notification_poll_interval(),
                || AppEvent::PollNotifications,
            ),
        ];
    }

    fn leave_workspace(&mut self) {
        self.pollers.clear();
        self.boards = None;
        self.kanban = None;
        self.archived = None;
        self.bell = NotificationFeed::new();
        self.press = None;
        self.searching = false;
    }

    fn poller(&self, name: &'static str, period: Duration, make: fn() -> AppEvent) -> Poller {
        let tx = self.tx.clone();
        Poller::spawn(name, period, move || {
            let _ = tx.send(Event::App(make()));
            std::future::ready(())
        })
    }

    /// Run a request on the runtime and deliver its result as an event.
    fn spawn<F, Fut>(&self, request: F)
    where
        F: FnOnce(Services) -> Fut,
        Fut: Future<Output = AppEvent> + Send + 'static,
    {
        let pending = request(self.services.clone());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if tx.send(Event::App(pending.await)).is_err() {
                tracing::debug!("Event loop closed; dropping request result");
            }
        });
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            Event::App(event) => self.handle_app_event(event),
            Event::Resize | Event::Tick => {}
        }
    }

    // -- authentication --

    pub fn submit_auth(&mut self) {
        let Some(form) = self.auth_form.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }
        let Some(request) = form.submit() else {
            return;
        };
        self.auth_notice = None;
        self.spawn(move |services| async move {
            AppEvent::AuthDone(auth::perform(&services, &request).await)
        });
    }

    fn auth_done(&mut self, result: TaskboardResult<AuthOutcome>) {
        let kind = self.auth_form.as_ref().map(|form| form.kind);
        if let Some(form) = self.auth_form.as_mut() {
            form.finished();
        }
        match result {
            Ok(AuthOutcome::SignedIn(user)) => self.sign_in(user),
            Ok(AuthOutcome::Message(message)) => {
                self.auth_notice = Some(Notice::info(message));
                if kind != Some(AuthFormKind::ForgotPassword) {
                    self.navigate(Route::Login);
                }
            }
            Err(TaskboardError::InvalidInput(errors)) => {
                if let Some(form) = self.auth_form.as_mut() {
                    form.errors = errors;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Authentication request failed");
                self.auth_notice = Some(Notice::from(&err));
            }
        }
    }

    fn sign_in(&mut self, user: User) {
        let token = user.token.clone();
        if let Err(err) = self.session.login(user) {
            tracing::error!(error = %err, "Could not persist session");
            self.auth_notice = Some(Notice::from(&err));
            return;
        }
        match (self.connector)(Some(&token)) {
            Ok(services) => self.services = services,
            Err(err) => {
                self.auth_notice = Some(Notice::from(&err));
                return;
            }
        }
        self.auth_notice = None;
        self.navigate(Route::Dashboard);
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.session.logout() {
            tracing::warn!(error = %err, "Clearing stored session failed");
        }
        self.leave_workspace();
        match (self.connector)(None) {
            Ok(services) => self.services = services,
            Err(err) => tracing::warn!(error = %err, "Rebuilding services failed"),
        }
        self.auth_notice = Some(Notice::info("Signed out"));
        self.navigate(Route::Login);
    }

    // -- board list --

    pub fn refresh_boards(&mut self, trigger: RefreshTrigger) {
        let Some(boards) = self.boards.as_mut() else {
            return;
        };
        let Some(ticket) = boards.begin_refresh(trigger) else {
            return;
        };
        self.spawn(move |services| async move {
            AppEvent::BoardsLoaded(ticket, board_list::fetch_summaries(&services).await)
        });
    }

    /// The open board, if it is `board_id`. Results for a board the user has left are dropped.
    fn open_kanban(&mut self, board_id: BoardId) -> Option<&mut KanbanBoardState> {
        let board = self.kanban.as_mut().filter(|k| k.board.id == board_id);
        if board.is_none() {
            tracing::debug!(board_id, "Board no longer open, dropping result");
        }
        board
    }

    fn refresh_board_stats(&self, board_id: BoardId) {
        if self.boards.is_none() {
            return;
        }
        self.spawn(move |services| async move {
            AppEvent::StatsLoaded(board_id, board_list::board_stats(&services, board_id).await)
        });
    }

    pub fn submit_board_form(&mut self) {
        let Some(boards) = self.boards.as_mut() else {
            return;
        };
        if boards.form.as_ref().is_some_and(|form| form.submitting) {
            return;
        }
        match boards.submit_form() {
            Ok(new_board) => self.spawn(move |services| async move {
                AppEvent::BoardCreated(board_list::create_board(&services, &new_board).await)
            }),
            Err(err) => tracing::debug!(error = %err, "Board form not sent"),
        }
    }

    pub fn confirm_board_delete(&mut self) {
        let Some(id) = self.boards.as_mut().and_then(BoardListState::confirm_delete) else {
            return;
        };
        self.spawn(move |services| async move {
            AppEvent::BoardDeleted(id, board_list::delete_board(&services, id).await)
        });
    }

    // -- kanban board --

    pub fn open_board(&mut self, board: Board) {
        let role = self.session.role().unwrap_or_default();
        let board_id = board.id;
        tracing::debug!(board_id, "Opening board");
        self.kanban = Some(KanbanBoardState::new(board, role));
        self.archived = None;
        self.searching = false;
        self.press = None;
        self.focus = Focus::Board;
        self.navigate(Route::Kanban);
        self.load_board(board_id);
    }

    pub fn load_board(&self, board_id: BoardId) {
        self.spawn(move |services| async move {
            let (tasks, users) = join!(
                kanban::fetch_tasks(&services, board_id),
                kanban::fetch_users(&services)
            );
            AppEvent::BoardLoaded {
                board_id,
                tasks,
                users,
            }
        });
    }

    pub fn commit_move(&self, pending: PendingMove) {
        let board_id = pending.task.board_id;
        self.spawn(move |services| async move {
            AppEvent::TaskMoved {
                board_id,
                result: kanban::send_move(&services, &pending).await,
            }
        });
    }

    pub fn submit_task_form(&mut self) {
        let Some(board) = self.kanban.as_mut() else {
            return;
        };
        if board.form.as_ref().is_some_and(|form| form.submitting) {
            return;
        }
        let board_id = board.board.id;
        match board.submit_form() {
            Ok(submission) => self.spawn(move |services| async move {
                AppEvent::TaskSaved {
                    board_id,
                    result: kanban::save_task(&services, &submission).await,
                }
            }),
            Err(err) => tracing::debug!(error = %err, "Task form not sent"),
        }
    }

    pub fn confirm_archive(&mut self) {
        let Some(board) = self.kanban.as_mut() else {
            return;
        };
        let board_id = board.board.id;
        let Some(id) = board.confirm_archive() else {
            return;
        };
        self.spawn(move |services| async move {
            AppEvent::TaskArchived {
                board_id,
                id,
                result: kanban::archive_task(&services, id).await,
            }
        });
    }

    // -- archived tasks --

    /// Open the archived view for the open board, or for every board when none is open.
    pub fn open_archived(&mut self) {
        let role = self.session.role().unwrap_or_default();
        let scope = match &self.kanban {
            Some(board) if self.focus == Focus::Board => ArchiveScope::Board(board.board.id),
            _ => ArchiveScope::All,
        };
        match ArchivedTasksState::open(role, scope) {
            Ok(state) => {
                self.archived = Some(state);
                self.load_archived();
            }
            Err(err) => {
                let notice = Some(Notice::from(&err));
                match (self.focus, self.kanban.as_mut(), self.boards.as_mut()) {
                    (Focus::Board, Some(board), _) => board.notice = notice,
                    (_, _, Some(boards)) => boards.notice = notice,
                    _ => {}
                }
            }
        }
    }

    fn load_archived(&self) {
        self.spawn(|services| async move {
            AppEvent::ArchivedLoaded(archived::fetch_archived(&services).await)
        });
    }

    pub fn restore_selected(&mut self) {
        let Some(view) = self.archived.as_mut() else {
            return;
        };
        if view.restoring.is_some() {
            return;
        }
        let Some(task) = view.selected_task().cloned() else {
            return;
        };
        match view.request_restore(task.id) {
            Ok(id) => self.spawn(move |services| async move {
                let result = archived::restore_task(&services, id).await;
                AppEvent::TaskRestored(task, result)
            }),
            Err(err) => tracing::debug!(error = %err, "Restore not sent"),
        }
    }

    // -- notifications --

    pub fn poll_notifications(&mut self) {
        let ticket = self.bell.begin_poll();
        self.spawn(move |services| async move {
            AppEvent::NotificationsLoaded(ticket, notifications::fetch(&services).await)
        });
    }

    pub fn mark_notification_read(&self, id: NotificationId) {
        self.spawn(move |services| async move {
            AppEvent::NotificationRead(id, notifications::mark_read(&services, id).await)
        });
    }

    pub fn mark_all_notifications_read(&self) {
        let unread = self.bell.unread_ids();
        if unread.is_empty() {
            return;
        }
        self.spawn(move |services| async move {
            AppEvent::NotificationsAllRead(notifications::mark_all_read(&services, unread).await)
        });
    }

    // -- results --

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::RoleResolved(role) => {
                if let Err(err) = self.session.set_role(role) {
                    tracing::warn!(error = %err, "Could not store resolved role");
                }
                if let Some(boards) = self.boards.as_mut() {
                    boards.role = role;
                }
                if let Some(board) = self.kanban.as_mut() {
                    board.role = role;
                }
            }
            AppEvent::BoardsLoaded(ticket, result) => {
                if let Some(boards) = self.boards.as_mut() {
                    match result {
                        Ok(summaries) => {
                            boards.refresh_loaded(ticket, summaries, Utc::now());
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "Board refresh failed");
                            boards.refresh_failed(ticket, &err);
                        }
                    }
                }
            }
            AppEvent::BoardCreated(result) => {
                let Some(boards) = self.boards.as_mut() else {
                    return;
                };
                match result {
                    Ok(board) => {
                        boards.board_created(board);
                        self.refresh_boards(RefreshTrigger::Mutation);
                    }
                    Err(err) => boards.create_failed(&err),
                }
            }
            AppEvent::BoardDeleted(id, result) => {
                let Some(boards) = self.boards.as_mut() else {
                    return;
                };
                match result {
                    Ok(()) => {
                        boards.board_deleted(id);
                        if self.kanban.as_ref().is_some_and(|k| k.board.id == id) {
                            self.kanban = None;
                            self.archived = None;
                            self.focus = Focus::Boards;
                        }
                    }
                    Err(err) => boards.delete_failed(&err),
                }
            }
            AppEvent::StatsLoaded(board_id, result) => match result {
                Ok(stats) => {
                    if let Some(boards) = self.boards.as_mut() {
                        boards.update_stats(board_id, stats);
                    }
                }
                Err(err) => tracing::warn!(board_id, error = %err, "Board stats unavailable"),
            },
            AppEvent::BoardLoaded {
                board_id,
                tasks,
                users,
            } => {
                let Some(board) = self.kanban.as_mut().filter(|k| k.board.id == board_id) else {
                    return;
                };
                board.users_loaded(users);
                match tasks {
                    Ok(tasks) => board.tasks_loaded(tasks),
                    Err(err) => {
                        tracing::warn!(board_id, error = %err, "Loading board failed");
                        board.load_failed(&err);
                    }
                }
            }
            AppEvent::TaskMoved { board_id, result } => {
                if result.is_ok() {
                    self.refresh_board_stats(board_id);
                }
                let Some(board) = self.open_kanban(board_id) else {
                    return;
                };
                match result {
                    Ok(task) => board.move_succeeded(task),
                    Err(err) => board.move_failed(&err),
                }
            }
            AppEvent::TaskSaved { board_id, result } => {
                if result.is_ok() {
                    self.refresh_board_stats(board_id);
                }
                let Some(board) = self.open_kanban(board_id) else {
                    return;
                };
                match result {
                    Ok(task) => board.form_saved(task),
                    Err(err) => board.form_failed(&err),
                }
            }
            AppEvent::TaskArchived {
                board_id,
                id,
                result,
            } => {
                if result.is_ok() {
                    self.refresh_board_stats(board_id);
                }
                let Some(board) = self.open_kanban(board_id) else {
                    return;
                };
                match result {
                    Ok(()) => board.task_archived(id),
                    Err(err) => board.archive_failed(&err),
                }
            }
            AppEvent::ArchivedLoaded(result) => {
                if let Some(view) = self.archived.as_mut() {
                    match result {
                        Ok(tasks) => view.loaded(tasks),
                        Err(err) => {
                            tracing::warn!(error = %err, "Archived tasks unavailable");
                            view.load_failed(&err);
                        }
                    }
                }
            }
            AppEvent::TaskRestored(task, result) => {
                let Some(view) = self.archived.as_mut() else {
                    return;
                };
                match result {
                    Ok(()) => {
                        view.restored(task.id);
                        let board_id = task.board_id;
                        if let Some(board) = self.kanban.as_mut() {
                            let mut task = task;
                            task.archived = false;
                            board.task_restored(task);
                        }
                        self.load_archived();
                        self.refresh_board_stats(board_id);
                    }
                    Err(err) => view.restore_failed(&err),
                }
            }
            AppEvent::NotificationsLoaded(ticket, result) => match result {
                Ok(items) => {
                    self.bell.apply(ticket, items, Utc::now());
                }
                Err(err) => self.bell.poll_failed(ticket, &err),
            },
            AppEvent::NotificationRead(id, result) => match result {
                Ok(()) => self.bell.marked_read(id),
                Err(err) => {
                    tracing::warn!(notification_id = id, error = %err, "Mark read failed");
                    self.bell.action_failed(&err);
                }
            },
            AppEvent::NotificationsAllRead(outcome) => {
                for id in &outcome.marked {
                    self.bell.marked_read(*id);
                }
                if let Some(err) = outcome.error {
                    self.bell.action_failed(&err);
                }
            }
            AppEvent::AuthDone(result) => self.auth_done(result),
            AppEvent::PollBoards => self.refresh_boards(RefreshTrigger::Poll),
            AppEvent::PollNotifications => self.poll_notifications(),
        }
    }

    pub async fn run(mut self, mut events: EventHandler) -> anyhow::Result<()> {
        let mut terminal = setup_terminal()?;
        self.start();

        while !self.should_quit {
            terminal.draw(|frame| ui::render(&mut self, frame))?;
            match events.next().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }

        events.stop();
        self.leave_workspace();
        restore_terminal(&mut terminal)?;
        Ok(())
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
