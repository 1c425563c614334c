//! Drag-and-drop lifecycle for moving a task between columns.
//!
//! ```text
//! Idle --start--> Dragging(task) --enter column--> HoveringColumn(task, column)
//!                      ^                                  |
//!                      +------- pointer leaves rect ------+
//! HoveringColumn --drop--> Idle   (commit if column differs from status)
//! any --release outside / cancel--> Idle
//! ```
//!
//! Hover is decided by pointer coordinates against each column's rectangle,
//! so moving across the cards inside a column never clears it.

use crate::geometry::{Point, Region};
use crate::task::{Task, TaskId};

/// Screen-space drop surface of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRect {
    pub column: String,
    pub area: Region,
}

impl ColumnRect {
    pub fn new(column: impl Into<String>, area: Region) -> Self {
        Self {
            column: column.into(),
            area,
        }
    }
}

/// Column whose rectangle contains `point`, if any.
pub fn column_at(rects: &[ColumnRect], point: Point) -> Option<&str> {
    rects
        .iter()
        .find(|rect| rect.area.contains(point))
        .map(|rect| rect.column.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Task),
    HoveringColumn(Task, String),
}

/// Status change to send to the server once a drop commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub task: Task,
    pub from: String,
    pub to: String,
}

impl PendingMove {
    pub fn task_id(&self) -> TaskId {
        self.task.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Target differs from the current status; a request must be made.
    Commit(PendingMove),
    /// Dropped onto the column the task is already in.
    NoOp,
    /// Released outside any column, or cancelled.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragError {
    /// A drag is already in progress.
    AlreadyDragging,
}

impl DragState {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn dragged(&self) -> Option<&Task> {
        match self {
            Self::Idle => None,
            Self::Dragging(task) | Self::HoveringColumn(task, _) => Some(task),
        }
    }

    pub fn hovered_column(&self) -> Option<&str> {
        match self {
            Self::HoveringColumn(_, column) => Some(column),
            _ => None,
        }
    }

    pub fn start(&mut self, task: Task) -> Result<(), DragError> {
        if self.is_active() {
            return Err(DragError::AlreadyDragging);
        }
        *self = Self::Dragging(task);
        Ok(())
    }

    /// Set or clear the hover target. Ignored while idle.
    pub fn hover(&mut self, column: Option<&str>) {
        let current = std::mem::take(self);
        *self = match (current, column) {
            (Self::Idle, _) => Self::Idle,
            (Self::Dragging(task) | Self::HoveringColumn(task, _), Some(column)) => {
                Self::HoveringColumn(task, column.to_string())
            }
            (Self::Dragging(task) | Self::HoveringColumn(task, _), None) => Self::Dragging(task),
        };
    }

    /// Pointer moved while dragging.
    pub fn pointer_moved(&mut self, rects: &[ColumnRect], point: Point) {
        let column = column_at(rects, point).map(String::from);
        self.hover(column.as_deref());
    }

    /// Finish the drag at the current hover target. Always returns to `Idle`.
    pub fn drop_here(&mut self) -> DropOutcome {
        match std::mem::take(self) {
            Self::HoveringColumn(task, column) if task.status == column => DropOutcome::NoOp,
            Self::HoveringColumn(task, column) => DropOutcome::Commit(PendingMove {
                from: task.status.clone(),
                to: column,
                task,
            }),
            Self::Dragging(_) | Self::Idle => DropOutcome::Abandoned,
        }
    }

    /// Finish the drag at a pointer position.
    pub fn release_at(&mut self, rects: &[ColumnRect], point: Point) -> DropOutcome {
        if !self.is_active() {
            return DropOutcome::Abandoned;
        }
        self.pointer_moved(rects, point);
        self.drop_here()
    }

    pub fn abandon(&mut self) {
        *self = Self::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rects() -> Vec<ColumnRect> {
        vec![
            ColumnRect::new("To Do", Region::new(0, 2, 20, 30)),
            ColumnRect::new("Doing", Region::new(20, 2, 20, 30)),
            ColumnRect::new("Done", Region::new(40, 2, 20, 30)),
        ]
    }

    fn task() -> Task {
        Task::new(1, 1, "Fix bug", "To Do")
    }

    #[test]
    fn test_hover_follows_pointer_and_clears_outside() {
        let mut drag = DragState::default();
        drag.start(task()).unwrap();
        drag.pointer_moved(&rects(), Point::new(25, 10));
        assert_eq!(drag.hovered_column(), Some("Doing"));
        drag.pointer_moved(&rects(), Point::new(25, 40));
        assert_eq!(drag, DragState::Dragging(task()));
    }

    #[test]
    fn test_drop_on_other_column_commits() {
        let mut drag = DragState::default();
        drag.start(task()).unwrap();
        let outcome = drag.release_at(&rects(), Point::new(22, 5));
        match outcome {
            DropOutcome::Commit(pending) => {
                assert_eq!(pending.from, "To Do");
                assert_eq!(pending.to, "Doing");
                assert_eq!(pending.task_id(), 1);
            }
            other => panic!("expected commit, got {other:?}"),
        }
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn test_drop_on_same_column_is_noop() {
        let mut drag = DragState::default();
        drag.start(task()).unwrap();
        assert_eq!(drag.release_at(&rects(), Point::new(3, 5)), DropOutcome::NoOp);
        assert!(!drag.is_active());
    }

    #[test]
    fn test_release_outside_abandons() {
        let mut drag = DragState::default();
        drag.start(task()).unwrap();
        drag.pointer_moved(&rects(), Point::new(25, 10));
        assert_eq!(drag.release_at(&rects(), Point::new(70, 70)), DropOutcome::Abandoned);
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn test_only_one_drag_at_a_time() {
        let mut drag = DragState::default();
        drag.start(task()).unwrap();
        assert_eq!(
            drag.start(Task::new(2, 1, "Other", "Done")),
            Err(DragError::AlreadyDragging)
        );
        assert_eq!(drag.dragged().map(|t| t.id), Some(1));
    }

    #[test]
    fn test_hover_ignored_when_idle() {
        let mut drag = DragState::default();
        drag.hover(Some("Done"));
        assert_eq!(drag, DragState::Idle);
    }
}
