//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity (cliente), identified by name and table number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "cliente_id", alias = "id", alias = "customer_id")]
    pub id: i64,
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    /// Table number the customer sits at
    #[serde(rename = "mesa", alias = "table", alias = "table_number")]
    pub table_number: i32,
}

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    #[serde(rename = "mesa", alias = "table", alias = "table_number")]
    pub table_number: i32,
}
