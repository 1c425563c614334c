use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::time::Duration;
use taskboard_client::{AuthOutcome, MarkAllOutcome};
use taskboard_core::TaskboardResult;
use taskboard_domain::{
    Board, BoardId, BoardStats, BoardSummary, Notification, NotificationId, Role, Task, TaskId,
    Ticket, UserSummary,
};
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
    App(AppEvent),
}

/// Results of background requests and timer firings, delivered to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    RoleResolved(Role),
    BoardsLoaded(Ticket, TaskboardResult<Vec<BoardSummary>>),
    BoardCreated(TaskboardResult<Board>),
    BoardDeleted(BoardId, TaskboardResult<()>),
    StatsLoaded(BoardId, TaskboardResult<BoardStats>),
    BoardLoaded {
        board_id: BoardId,
        tasks: TaskboardResult<Vec<Task>>,
        users: Vec<UserSummary>,
    },
    TaskMoved {
        board_id: BoardId,
        result: TaskboardResult<Task>,
    },
    TaskSaved {
        board_id: BoardId,
        result: TaskboardResult<Task>,
    },
    TaskArchived {
        board_id: BoardId,
        id: TaskId,
        result: TaskboardResult<()>,
    },
    ArchivedLoaded(TaskboardResult<Vec<Task>>),
    TaskRestored(Task, TaskboardResult<()>),
    NotificationsLoaded(Ticket, TaskboardResult<Vec<Notification>>),
    NotificationRead(NotificationId, TaskboardResult<()>),
    NotificationsAllRead(MarkAllOutcome),
    AuthDone(TaskboardResult<AuthOutcome>),
    PollBoards,
    PollNotifications,
}

pub struct EventHandler {
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    shutdown_tx: Option<mpsc::UnboundedSender<()>>,
}

impl EventHandler {
    /// Reads terminal input on a background task.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, mut shutdown_rx) = mpsc::unbounded_channel();
        let input_tx = tx.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_millis(16)) => {
                        let event = if event::poll(Duration::from_millis(0)).unwrap_or(false) {
                            match event::read() {
                                Ok(CrosstermEvent::Key(key)) => Some(Event::Key(key)),
                                Ok(CrosstermEvent::Mouse(mouse)) => Some(Event::Mouse(mouse)),
                                Ok(CrosstermEvent::Resize(..)) => Some(Event::Resize),
                                _ => None,
                            }
                        } else {
                            Some(Event::Tick)
                        };
                        if let Some(event) = event {
                            if input_tx.send(event).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self {
            tx,
            rx,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// A channel with no terminal attached. Only application events arrive.
    pub fn detached() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            shutdown_tx: None,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        if let Some(shutdown_tx) = &self.shutdown_tx {
            let _ = shutdown_tx.send(());
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

pub fn should_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) || is_interrupt(key)
}
