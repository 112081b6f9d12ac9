//! Data models
//!
//! One struct per backend entity. Field names are English; serde maps them to
//! the canonical Portuguese keys and accepts the English spellings on input.
//! All IDs are `i64`, all amounts are `Decimal` carried as JSON numbers.

pub mod category;
pub mod customer;
pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod payment;

// Re-exports
pub use category::*;
pub use customer::*;
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use payment::*;

pub(crate) fn default_true() -> bool {
    true
}
