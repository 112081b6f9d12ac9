//! Request payloads for the order endpoints

use serde::{Deserialize, Serialize};

use super::OrderStatus;

/// One line of an order submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub item_id: i64,
    #[serde(rename = "quantidade", alias = "quantity")]
    pub quantity: i32,
}

/// Create order payload
///
/// The backend merges these lines into the customer's open order if one
/// exists, otherwise it opens a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    #[serde(rename = "cliente_id", alias = "customer_id")]
    pub customer_id: i64,
    #[serde(rename = "itens", alias = "items")]
    pub lines: Vec<OrderLineInput>,
}

/// Update status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdateStatus {
    pub status: OrderStatus,
}
