//! Notification list — newest first, bounded.

use super::{NewNotification, Notification};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Default number of notifications kept.
pub const MAX_NOTIFICATIONS: usize = 5;

/// Duration applied when a notification doesn't carry one, in ms.
pub const DEFAULT_DURATION_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct Notifications {
    items: VecDeque<Notification>,
    max_size: usize,
    next_id: u64,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(MAX_NOTIFICATIONS)
    }
}

impl Notifications {
    pub fn new(max_size: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(max_size),
            max_size,
            next_id: 1,
        }
    }

    /// Add a notification stamped with the current time. Returns its id.
    pub fn add(&mut self, new: NewNotification) -> u64 {
        self.add_at(new, Utc::now())
    }

    /// Add a notification stamped with `timestamp`, evicting the oldest if full.
    ///
    /// A zero-capacity list hands out ids but stores nothing.
    pub fn add_at(&mut self, new: NewNotification, timestamp: DateTime<Utc>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.max_size == 0 {
            return id;
        }
        while self.items.len() >= self.max_size {
            self.items.pop_back();
        }
        self.items.push_front(Notification {
            id,
            kind: new.kind,
            title: new.title,
            message: new.message,
            duration: new.duration.unwrap_or(DEFAULT_DURATION_MS),
            timestamp,
            read: false,
            persistent: new.persistent,
        });
        id
    }

    pub fn remove(&mut self, id: u64) -> Option<Notification> {
        let idx = self.items.iter().position(|n| n.id == id)?;
        self.items.remove(idx)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    /// Drop every notification whose duration has elapsed by `now`.
    /// Returns how many were removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.items.len();
        self.items.retain(|n| !n.is_expired(now));
        before - self.items.len()
    }

    /// Notifications, newest first.
    pub fn items(&self) -> &VecDeque<Notification> {
        &self.items
    }

    pub fn get(&self, id: u64) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_newest_first_and_capped() {
        let mut ns = Notifications::default();
        let ids: Vec<u64> = (0..7)
            .map(|i| ns.add(NewNotification::info(format!("n{}", i), "")))
            .collect();
        assert_eq!(ns.len(), MAX_NOTIFICATIONS);
        assert_eq!(ns.items().front().unwrap().id, ids[6]);
        assert_eq!(ns.items().back().unwrap().id, ids[2]);
        assert!(ns.get(ids[0]).is_none());
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut ns = Notifications::new(0);
        let a = ns.add(NewNotification::info("a", ""));
        let b = ns.add(NewNotification::info("b", ""));
        assert_ne!(a, b);
        assert!(ns.is_empty());
        assert!(ns.get(a).is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ns = Notifications::new(10);
        let a = ns.add(NewNotification::info("a", ""));
        let b = ns.add(NewNotification::info("b", ""));
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_and_mark_read() {
        let mut ns = Notifications::default();
        let a = ns.add(NewNotification::success("a", ""));
        let b = ns.add(NewNotification::error("b", ""));
        assert_eq!(ns.unread_count(), 2);
        assert!(ns.mark_read(a));
        assert!(ns.get(a).unwrap().read);
        assert_eq!(ns.unread_count(), 1);
        assert_eq!(ns.remove(b).unwrap().title, "b");
        assert!(ns.remove(b).is_none());
        assert!(!ns.mark_read(b));
        ns.clear();
        assert!(ns.is_empty());
    }

    #[test]
    fn test_missing_duration_defaults() {
        let mut ns = Notifications::default();
        let new = NewNotification {
            duration: None,
            ..NewNotification::error("e", "")
        };
        let id = ns.add(new);
        assert_eq!(ns.get(id).unwrap().duration, DEFAULT_DURATION_MS);
    }

    #[test]
    fn test_prune_expired_keeps_persistent() {
        let mut ns = Notifications::default();
        let t0 = Utc::now();
        let short = ns.add_at(NewNotification::success("short", ""), t0);
        let long = ns.add_at(NewNotification::error("long", ""), t0);
        let sticky = ns.add_at(NewNotification::warning("sticky", "").persistent(), t0);

        assert_eq!(ns.prune_expired(t0 + Duration::milliseconds(6_000)), 1);
        assert!(ns.get(short).is_none());
        assert!(ns.get(long).is_some());

        assert_eq!(ns.prune_expired(t0 + Duration::milliseconds(8_000)), 1);
        assert!(ns.get(long).is_none());
        assert!(ns.get(sticky).is_some());
    }
}
