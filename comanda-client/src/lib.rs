//! Comanda Client - restaurant ordering client
//!
//! HTTP access to the restaurant API, the realtime socket channel, and the
//! screen state behind the customer and backoffice applications.

pub mod cart;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod realtime;
pub mod state;

pub use cart::{Cart, CartLine};
pub use client::{ApiClient, HttpClient, NetworkHttpClient};
pub use config::{ClientConfig, Environment};
pub use error::{ClientError, ClientResult};
pub use realtime::{ConnectionState, EventListener, ListenerId, RealtimeClient, RealtimeConfig};

// Re-export shared types for convenience
pub use shared;
pub use shared::message::{EventKind, Notification, RealtimeEvent};
pub use shared::order::OrderStatus;
