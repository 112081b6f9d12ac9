//! Realtime module - socket channel and event dispatch
//!
//! - [`EventListener`]: named-event callback registry
//! - [`RealtimeClient`]: socket connection that feeds the listener
//! - [`protocol`]: Engine.IO / Socket.IO frame codec

pub mod listener;
pub mod protocol;
pub mod transport;

pub use listener::{EventListener, ListenerId};
pub use transport::{ConnectionState, RealtimeClient, RealtimeConfig};
