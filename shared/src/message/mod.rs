//! Realtime message types
//!
//! The backend pushes entity snapshots over the socket channel under a small
//! set of event names. Each payload is the full, server-confirmed entity.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::SchemaResult;
use crate::models::{DiningTable, Order, Payment};

/// New order placed
pub const EVENT_ORDER_NEW: &str = "pedido_novo";
/// Order changed (status, lines, closed flag)
pub const EVENT_ORDER_UPDATED: &str = "pedido_atualizado";
/// Payment registered for an order
pub const EVENT_PAYMENT_RECEIVED: &str = "pagamento_recebido";
/// Table status changed
pub const EVENT_TABLE_STATUS: &str = "mesa_status";

/// Well-known event names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "pedido_novo")]
    OrderNew,
    #[serde(rename = "pedido_atualizado")]
    OrderUpdated,
    #[serde(rename = "pagamento_recebido")]
    PaymentReceived,
    #[serde(rename = "mesa_status")]
    TableStatus,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::OrderNew,
        EventKind::OrderUpdated,
        EventKind::PaymentReceived,
        EventKind::TableStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderNew => EVENT_ORDER_NEW,
            Self::OrderUpdated => EVENT_ORDER_UPDATED,
            Self::PaymentReceived => EVENT_PAYMENT_RECEIVED,
            Self::TableStatus => EVENT_TABLE_STATUS,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded realtime event
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    OrderNew(Order),
    OrderUpdated(Order),
    PaymentReceived(Payment),
    TableStatus(DiningTable),
}

impl RealtimeEvent {
    /// Decode a payload received under a well-known event name
    pub fn decode(kind: EventKind, payload: &Value) -> SchemaResult<Self> {
        let event = match kind {
            EventKind::OrderNew => Self::OrderNew(Order::deserialize(payload)?),
            EventKind::OrderUpdated => Self::OrderUpdated(Order::deserialize(payload)?),
            EventKind::PaymentReceived => Self::PaymentReceived(Payment::deserialize(payload)?),
            EventKind::TableStatus => Self::TableStatus(DiningTable::deserialize(payload)?),
        };
        Ok(event)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::OrderNew(_) => EventKind::OrderNew,
            Self::OrderUpdated(_) => EventKind::OrderUpdated,
            Self::PaymentReceived(_) => EventKind::PaymentReceived,
            Self::TableStatus(_) => EventKind::TableStatus,
        }
    }

    /// Notification text shown to staff
    pub fn notification(&self) -> Notification {
        match self {
            Self::OrderNew(order) => Notification::info(format!("Novo pedido #{}", order.id)),
            Self::OrderUpdated(order) => Notification::success(format!(
                "Pedido #{} atualizado: {}",
                order.id,
                order.status.label()
            )),
            Self::PaymentReceived(payment) => Notification::success(format!(
                "Pagamento confirmado para o pedido #{}",
                payment.order_id
            )),
            Self::TableStatus(table) => Notification::info(format!(
                "{} agora está {}",
                table.label(),
                table.status.label()
            )),
        }
    }
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Inline notification for a screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}
