//! Order lifecycle module
//!
//! - Status: the enumerated progression an order moves through
//! - Types: request payloads for creating orders and changing status

pub mod status;
pub mod types;

// Re-exports
pub use status::{OrderStatus, StatusAction};
pub use types::*;
