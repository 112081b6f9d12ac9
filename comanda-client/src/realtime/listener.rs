// comanda-client/src/realtime/listener.rs
// Named-event callback registry

use serde_json::Value;
use shared::message::{EventKind, RealtimeEvent};
use shared::models::{DiningTable, Order, Payment};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

type Callback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Handle returned by [`EventListener::on`], used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

/// Event name → callbacks, in registration order
///
/// Cheap to clone; clones share the same registry. Dispatch runs on a
/// snapshot so callbacks may register or unregister while being invoked.
#[derive(Clone, Default)]
pub struct EventListener {
    handlers: Arc<RwLock<HashMap<String, Vec<(ListenerId, Callback)>>>>,
}

impl EventListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for `event`
    pub fn on<F>(&self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = ListenerId(Uuid::new_v4());
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers
            .entry(event.to_string())
            .or_default()
            .push((id, Arc::new(callback)));
        tracing::debug!(event, "Listener registered");
        id
    }

    /// Remove exactly one registration. Returns whether it existed.
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        let Some(list) = handlers.get_mut(event) else {
            return false;
        };
        let before = list.len();
        list.retain(|(existing, _)| *existing != id);
        let removed = list.len() != before;
        if list.is_empty() {
            handlers.remove(event);
        }
        removed
    }

    /// Invoke every callback registered for `event`; returns how many ran
    pub fn emit(&self, event: &str, payload: &Value) -> usize {
        let snapshot: Vec<Callback> = {
            let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
            match handlers.get(event) {
                Some(list) => list.iter().map(|(_, cb)| cb.clone()).collect(),
                None => return 0,
            }
        };
        for callback in &snapshot {
            callback(payload);
        }
        snapshot.len()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        handlers.get(event).map_or(0, Vec::len)
    }

    pub fn clear(&self) {
        self.handlers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    // ========== Typed helpers ==========

    /// Subscribe to a well-known event, decoding the payload first
    ///
    /// Payloads that do not decode are logged and skipped.
    pub fn on_event<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(RealtimeEvent) + Send + Sync + 'static,
    {
        self.on(kind.as_str(), move |payload| {
            match RealtimeEvent::decode(kind, payload) {
                Ok(event) => callback(event),
                Err(e) => tracing::warn!(event = %kind, error = %e, "Dropping undecodable event"),
            }
        })
    }

    /// Subscribe to every well-known event
    pub fn on_any_event<F>(&self, callback: F) -> Vec<(EventKind, ListenerId)>
    where
        F: Fn(RealtimeEvent) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        EventKind::ALL
            .into_iter()
            .map(|kind| {
                let cb = callback.clone();
                (kind, self.on_event(kind, move |event| cb(event)))
            })
            .collect()
    }

    pub fn on_order_new<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(Order) + Send + Sync + 'static,
    {
        self.on_event(EventKind::OrderNew, move |event| {
            if let RealtimeEvent::OrderNew(order) = event {
                callback(order);
            }
        })
    }

    pub fn on_order_updated<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(Order) + Send + Sync + 'static,
    {
        self.on_event(EventKind::OrderUpdated, move |event| {
            if let RealtimeEvent::OrderUpdated(order) = event {
                callback(order);
            }
        })
    }

    pub fn on_payment_received<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(Payment) + Send + Sync + 'static,
    {
        self.on_event(EventKind::PaymentReceived, move |event| {
            if let RealtimeEvent::PaymentReceived(payment) = event {
                callback(payment);
            }
        })
    }

    pub fn on_table_status<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(DiningTable) + Send + Sync + 'static,
    {
        self.on_event(EventKind::TableStatus, move |event| {
            if let RealtimeEvent::TableStatus(table) = event {
                callback(table);
            }
        })
    }
}

impl std::fmt::Debug for EventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        let counts: HashMap<&str, usize> = handlers
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        f.debug_struct("EventListener").field("handlers", &counts).finish()
    }
}
