//! Notification bell state.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use taskboard_core::TaskboardError;

use crate::geometry::{Point, Region};
use crate::notification::{Notification, NotificationId};
use crate::ticket::{Ticket, TicketCounter};

/// How long the bell pulses after the unread count grows.
pub const PULSE_MILLIS: i64 = 500;

/// Keep the first occurrence of each id, then order newest first.
/// Entries without a timestamp sort last.
pub fn dedupe_and_sort(raw: Vec<Notification>) -> Vec<Notification> {
    let mut seen = HashSet::new();
    let mut items: Vec<Notification> = raw.into_iter().filter(|n| seen.insert(n.id)).collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items
}

/// Badge text for an unread count; hidden at zero.
pub fn badge_text(unread: usize) -> Option<String> {
    match unread {
        0 => None,
        n if n > 99 => Some("99+".to_string()),
        n => Some(n.to_string()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    items: Vec<Notification>,
    tickets: TicketCounter,
    open: bool,
    pulse_until: Option<DateTime<Utc>>,
    pub selected: usize,
    pub last_error: Option<String>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn badge(&self) -> Option<String> {
        badge_text(self.unread_count())
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_pulsing(&self, now: DateTime<Utc>) -> bool {
        self.pulse_until.is_some_and(|until| now < until)
    }

    pub fn begin_poll(&mut self) -> Ticket {
        self.tickets.issue()
    }

    /// Apply a fetched list. Returns false if a newer poll was already applied.
    pub fn apply(&mut self, ticket: Ticket, raw: Vec<Notification>, now: DateTime<Utc>) -> bool {
        if !self.tickets.accept(ticket) {
            return false;
        }
        let previous_unread = self.unread_count();
        self.items = dedupe_and_sort(raw);
        self.last_error = None;
        let unread = self.unread_count();
        if unread > previous_unread {
            self.pulse_until = Some(now + Duration::milliseconds(PULSE_MILLIS));
        }
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
        tracing::debug!(total = self.items.len(), unread, "Notifications updated");
        true
    }

    pub fn poll_failed(&mut self, ticket: Ticket, err: &TaskboardError) {
        if self.tickets.is_latest(ticket) {
            self.tickets.accept(ticket);
        }
        self.last_error = Some(err.user_message());
    }

    /// The server confirmed a single notification as read.
    pub fn marked_read(&mut self, id: NotificationId) {
        if let Some(item) = self.items.iter_mut().find(|n| n.id == id) {
            item.read = true;
        }
    }

    pub fn marked_all_read(&mut self) {
        for item in &mut self.items {
            item.read = true;
        }
    }

    pub fn unread_ids(&self) -> Vec<NotificationId> {
        self.items.iter().filter(|n| !n.read).map(|n| n.id).collect()
    }

    pub fn action_failed(&mut self, err: &TaskboardError) {
        self.last_error = Some(err.user_message());
    }

    pub fn selected_item(&self) -> Option<&Notification> {
        self.items.get(self.selected)
    }

    pub fn select(&mut self, step: isize) {
        if self.items.is_empty() {
            return;
        }
        let next = (self.selected as isize + step).clamp(0, self.items.len() as isize - 1);
        self.selected = next as usize;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Close the dropdown when a click lands outside the bell and its dropdown.
    /// Returns true if the click was outside.
    pub fn click_at(&mut self, point: Point, regions: &[Region]) -> bool {
        let outside = !regions.iter().any(|region| region.contains(point));
        if outside {
            self.close();
        }
        outside
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationKind;

    fn item(id: i64, read: bool, minutes_ago: i64, now: DateTime<Utc>) -> Notification {
        Notification {
            id,
            kind: NotificationKind::TaskUpdated,
            message: format!("n{id}"),
            read,
            created_at: Some(now - Duration::minutes(minutes_ago)),
        }
    }

    #[test]
    fn test_dedupe_keeps_first_and_sorts_newest_first() {
        let now = Utc::now();
        let mut dup = item(1, true, 0, now);
        dup.message = "duplicate".into();
        let items = dedupe_and_sort(vec![
            item(1, false, 30, now),
            item(2, false, 5, now),
            dup,
            item(3, true, 60, now),
        ]);
        let ids: Vec<_> = items.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(items[1].message, "n1");
    }

    #[test]
    fn test_no_duplicate_ids_after_fetch() {
        let now = Utc::now();
        let mut feed = NotificationFeed::new();
        let ticket = feed.begin_poll();
        feed.apply(
            ticket,
            vec![item(1, false, 1, now), item(1, false, 1, now), item(2, false, 2, now)],
            now,
        );
        let mut ids: Vec<_> = feed.items().iter().map(|n| n.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), feed.items().len());
    }

    #[test]
    fn test_pulse_only_when_unread_grows() {
        let now = Utc::now();
        let mut feed = NotificationFeed::new();
        let t1 = feed.begin_poll();
        feed.apply(t1, vec![item(1, false, 1, now)], now);
        assert!(feed.is_pulsing(now));
        assert!(!feed.is_pulsing(now + Duration::seconds(1)));

        let later = now + Duration::minutes(2);
        let t2 = feed.begin_poll();
        feed.apply(t2, vec![item(1, false, 1, now)], later);
        assert!(!feed.is_pulsing(later));

        let t3 = feed.begin_poll();
        feed.apply(t3, vec![item(1, false, 1, now), item(2, false, 0, now)], later);
        assert!(feed.is_pulsing(later));
        assert_eq!(feed.unread_count(), 2);
    }

    #[test]
    fn test_stale_poll_ignored() {
        let now = Utc::now();
        let mut feed = NotificationFeed::new();
        let old = feed.begin_poll();
        let new = feed.begin_poll();
        assert!(feed.apply(new, vec![item(2, false, 0, now)], now));
        assert!(!feed.apply(old, vec![], now));
        assert_eq!(feed.items().len(), 1);
    }

    #[test]
    fn test_mark_read_and_all() {
        let now = Utc::now();
        let mut feed = NotificationFeed::new();
        let t = feed.begin_poll();
        feed.apply(t, vec![item(1, false, 1, now), item(2, false, 2, now)], now);
        feed.marked_read(1);
        assert_eq!(feed.unread_ids(), vec![2]);
        feed.marked_all_read();
        assert_eq!(feed.unread_count(), 0);
        assert_eq!(feed.badge(), None);
    }

    #[test]
    fn test_badge_caps_at_99() {
        assert_eq!(badge_text(5).as_deref(), Some("5"));
        assert_eq!(badge_text(99).as_deref(), Some("99"));
        assert_eq!(badge_text(100).as_deref(), Some("99+"));
    }

    #[test]
    fn test_click_outside_closes() {
        let mut feed = NotificationFeed::new();
        feed.toggle();
        let regions = [Region::new(70, 0, 10, 1), Region::new(50, 1, 30, 10)];
        assert!(!feed.click_at(Point::new(60, 5), &regions));
        assert!(feed.is_open());
        assert!(feed.click_at(Point::new(5, 5), &regions));
        assert!(!feed.is_open());
    }
}
