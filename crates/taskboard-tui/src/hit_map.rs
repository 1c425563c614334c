//! Screen regions recorded during the last draw, used to resolve mouse events.

use ratatui::layout::Rect;
use taskboard_domain::{BoardId, ColumnRect, NotificationId, Point, Region, TaskId};

pub fn region(rect: Rect) -> Region {
    Region::new(rect.x, rect.y, rect.width, rect.height)
}

#[derive(Debug, Clone, Default)]
pub struct HitMap {
    /// Drop surfaces: the whole column block, not just its cards.
    pub columns: Vec<ColumnRect>,
    pub cards: Vec<(Region, TaskId)>,
    pub boards: Vec<(Region, BoardId)>,
    pub bell: Option<Region>,
    pub dropdown: Option<Region>,
    pub notifications: Vec<(Region, NotificationId)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn card_at(&self, point: Point) -> Option<TaskId> {
        find(&self.cards, point)
    }

    pub fn board_at(&self, point: Point) -> Option<BoardId> {
        find(&self.boards, point)
    }

    pub fn notification_at(&self, point: Point) -> Option<NotificationId> {
        find(&self.notifications, point)
    }

    pub fn on_bell(&self, point: Point) -> bool {
        self.bell.is_some_and(|bell| bell.contains(point))
    }

    /// Regions that count as "inside" the notification bell.
    pub fn bell_regions(&self) -> Vec<Region> {
        self.bell.into_iter().chain(self.dropdown).collect()
    }
}

fn find<T: Copy>(entries: &[(Region, T)], point: Point) -> Option<T> {
    entries
        .iter()
        .rev()
        .find(|(area, _)| area.contains(point))
        .map(|(_, value)| *value)
}
