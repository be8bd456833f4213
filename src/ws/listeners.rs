//! Listener registry — event name → callbacks.

use super::WsEvent;
use std::collections::HashMap;
use std::sync::Arc;

/// Handle returned by [`Listeners::on`], used to remove one callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Arc<dyn Fn(&WsEvent) + Send + Sync>;

/// Flat map from event name (see [`WsEvent::name`]) to callbacks.
///
/// Callbacks for a name run in registration order.
#[derive(Default)]
pub struct Listeners {
    by_event: HashMap<String, Vec<(ListenerId, Callback)>>,
    next_id: u64,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .by_event
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        f.debug_struct("Listeners").field("by_event", &counts).finish()
    }
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, event: impl Into<String>, callback: F) -> ListenerId
    where
        F: Fn(&WsEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.by_event
            .entry(event.into())
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove one callback (`Some(id)`) or every callback for `event` (`None`).
    /// Returns how many were removed.
    pub fn off(&mut self, event: &str, id: Option<ListenerId>) -> usize {
        let Some(list) = self.by_event.get_mut(event) else {
            return 0;
        };
        let before = list.len();
        match id {
            Some(id) => list.retain(|(lid, _)| *lid != id),
            None => list.clear(),
        }
        let removed = before - list.len();
        if list.is_empty() {
            self.by_event.remove(event);
        }
        removed
    }

    /// Callbacks registered for `event`, in registration order.
    ///
    /// Cloned out so callers can invoke them without holding a lock on
    /// the registry.
    pub fn callbacks(&self, event: &str) -> Vec<Callback> {
        self.by_event
            .get(event)
            .map(|list| list.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default()
    }

    /// Invoke every callback registered for `event.name()`.
    pub fn emit(&self, event: &WsEvent) -> usize {
        let callbacks = self.callbacks(event.name());
        for cb in &callbacks {
            cb(event);
        }
        callbacks.len()
    }

    pub fn count(&self, event: &str) -> usize {
        self.by_event.get(event).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.by_event.clear();
    }
}
