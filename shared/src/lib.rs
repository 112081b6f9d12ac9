//! Shared types for the Comanda client
//!
//! Canonical wire schema for the restaurant ordering backend: entities,
//! status enumerations, realtime event names, response envelopes and
//! money helpers. The canonical contract is the Portuguese-keyed one served
//! under `/api`; English-keyed spellings are accepted on input only.

pub mod error;
pub mod message;
pub mod models;
pub mod money;
pub mod order;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{SchemaError, SchemaResult};
pub use message::{EventKind, Notification, NotificationLevel, RealtimeEvent};
pub use order::{OrderStatus, StatusAction};

/// Version of the wire schema this crate speaks.
pub const SCHEMA_VERSION: u32 = 1;
