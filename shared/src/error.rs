//! Error types for the shared crate

use thiserror::Error;

/// Schema error - raised when a payload does not fit the canonical contract
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Enum value not known under any accepted spelling
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// Amount string could not be parsed as money
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Payload is valid JSON but not the expected entity
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SchemaError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
