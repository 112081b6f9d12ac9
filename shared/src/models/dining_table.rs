//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;
use crate::util::normalize_key;

/// Dining table entity (mesa)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(rename = "mesa_id", alias = "id")]
    pub id: i64,
    #[serde(rename = "numero", alias = "number")]
    pub number: i32,
    #[serde(rename = "capacidade", alias = "capacity", default)]
    pub capacity: i32,
    #[serde(default)]
    pub status: TableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

impl DiningTable {
    /// Display name, e.g. `Mesa 4`
    pub fn label(&self) -> String {
        format!("Mesa {}", self.number)
    }
}

/// Table status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TableStatus {
    #[default]
    Free,
    Occupied,
    Reserved,
    Cleaning,
}

impl TableStatus {
    pub const ALL: [TableStatus; 4] = [
        TableStatus::Free,
        TableStatus::Occupied,
        TableStatus::Reserved,
        TableStatus::Cleaning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "livre",
            Self::Occupied => "ocupada",
            Self::Reserved => "reservada",
            Self::Cleaning => "limpeza",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Free => "Disponível",
            Self::Occupied => "Ocupada",
            Self::Reserved => "Reservada",
            Self::Cleaning => "Limpeza",
        }
    }
}

impl FromStr for TableStatus {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "livre" | "disponivel" | "available" | "free" => Ok(Self::Free),
            "ocupada" | "occupied" => Ok(Self::Occupied),
            "reservada" | "reserved" => Ok(Self::Reserved),
            "limpeza" | "cleaning" => Ok(Self::Cleaning),
            _ => Err(SchemaError::unknown("table status", s)),
        }
    }
}

impl TryFrom<String> for TableStatus {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TableStatus> for String {
    fn from(status: TableStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    #[serde(rename = "numero", alias = "number")]
    pub number: i32,
    #[serde(rename = "capacidade", alias = "capacity")]
    pub capacity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TableStatus>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    #[serde(rename = "numero", alias = "number", skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(
        rename = "capacidade",
        alias = "capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TableStatus>,
}
