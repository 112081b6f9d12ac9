//! Order Model
//!
//! Snapshot of an order as the backend reports it. Totals are computed
//! server-side; the client only displays them.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Customer, MenuItem};
use crate::money::format_price;
use crate::order::OrderStatus;
use crate::util::datetime_opt;

/// Order entity (pedido)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "pedido_id", alias = "id", alias = "order_id")]
    pub id: i64,
    #[serde(
        rename = "cliente_id",
        alias = "customer_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(
        rename = "data_hora",
        alias = "created_at",
        default,
        with = "datetime_opt"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Closed for payment (tab requested)
    #[serde(rename = "fechado", alias = "closed", default)]
    pub closed: bool,
    #[serde(rename = "itens", alias = "items", default)]
    pub lines: Vec<OrderLine>,
    #[serde(
        rename = "cliente",
        alias = "customer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub customer: Option<Customer>,
}

impl Order {
    pub fn total_label(&self) -> String {
        format_price(self.total)
    }

    /// Sum of line quantities
    pub fn item_count(&self) -> i32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer.as_ref().map(|c| c.name.as_str())
    }

    pub fn table_number(&self) -> Option<i32> {
        self.customer.as_ref().map(|c| c.table_number)
    }

    /// Case-insensitive match on order id, customer name or table number
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        if self.id.to_string().contains(&query) {
            return true;
        }
        match &self.customer {
            Some(c) => {
                c.name.to_lowercase().contains(&query)
                    || c.table_number.to_string().contains(&query)
            }
            None => false,
        }
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<i64>,
    #[serde(rename = "quantidade", alias = "quantity")]
    pub quantity: i32,
    /// Embedded menu item, when the backend joins it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<MenuItem>,
    /// Flattened item name, sent by some endpoints instead of `item`
    #[serde(
        rename = "nome",
        alias = "name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        rename = "preco",
        alias = "price",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
}

impl OrderLine {
    pub fn display_name(&self) -> &str {
        self.item
            .as_ref()
            .map(|i| i.name.as_str())
            .or(self.name.as_deref())
            .unwrap_or("Item")
    }

    pub fn unit_price(&self) -> Decimal {
        self.item
            .as_ref()
            .map(|i| i.price)
            .or(self.price)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }
}
