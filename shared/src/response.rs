//! API Response types
//!
//! The backend is not uniform about envelopes: most endpoints wrap the
//! entity under a key (`{"pedido": {...}}`, `{"itens": [...]}`), some
//! return the bare object. [`unwrap_envelope`] reads either form.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaResult;
use crate::models::DiningTable;

/// Error body: `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "erro")]
    pub error: String,
}

/// Plain acknowledgement: `{"message": "..."}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, alias = "mensagem")]
    pub message: String,
}

/// Response of `GET /mesas/disponiveis`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableTables {
    #[serde(rename = "mesas_disponiveis", alias = "tables", default)]
    pub tables: Vec<DiningTable>,
    #[serde(rename = "total_mesas", alias = "total", default)]
    pub total: usize,
}

/// Decode `value[key]` when the body is an object carrying that key,
/// otherwise decode the whole body.
pub fn unwrap_envelope<T: DeserializeOwned>(value: Value, key: &str) -> SchemaResult<T> {
    let inner = match value {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    };
    Ok(serde_json::from_value(inner)?)
}

/// Pull a human-readable error message out of an error body
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.is_empty())
}
