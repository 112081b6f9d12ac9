//! Optimistic update bookkeeping
//!
//! `begin` records the last server-confirmed value of an entity before the
//! screen shows the optimistic one. The call then either `confirm`s (server
//! value replaces the display) or `revert`s (the recorded value comes back).
//! A realtime snapshot is server-confirmed and simply `settle`s the entry.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct PendingUpdates<T> {
    confirmed: HashMap<i64, T>,
}

impl<T> Default for PendingUpdates<T> {
    fn default() -> Self {
        Self {
            confirmed: HashMap::new(),
        }
    }
}

impl<T> PendingUpdates<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` pending, remembering `confirmed`. Returns false (and keeps
    /// the first snapshot) when an update is already in flight.
    pub fn begin(&mut self, id: i64, confirmed: T) -> bool {
        if self.confirmed.contains_key(&id) {
            return false;
        }
        self.confirmed.insert(id, confirmed);
        true
    }

    pub fn is_pending(&self, id: i64) -> bool {
        self.confirmed.contains_key(&id)
    }

    /// Server accepted the change
    pub fn confirm(&mut self, id: i64) {
        self.confirmed.remove(&id);
    }

    /// Server rejected the change; returns the value to restore
    pub fn revert(&mut self, id: i64) -> Option<T> {
        self.confirmed.remove(&id)
    }

    /// A server snapshot arrived for `id`
    pub fn settle(&mut self, id: i64) {
        self.confirmed.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }
}
