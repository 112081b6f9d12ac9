//! Client error types

use shared::SchemaError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server answered with a non-2xx status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request never got an answer (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Body could not be read as the expected entity
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input rejected before reaching the server
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// Socket channel failure
    #[error("Realtime error: {0}")]
    Realtime(String),
}

impl ClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message shown inline on the screen that triggered the call
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            Self::Api { status, .. } => format!("Erro do servidor ({status})"),
            Self::Network(_) => "Não foi possível conectar ao servidor".to_string(),
            Self::InvalidResponse(_) | Self::Serialization(_) => {
                "Resposta inválida do servidor".to_string()
            }
            Self::Validation(message) => message.clone(),
            Self::Config(message) => format!("Configuração inválida: {message}"),
            Self::Realtime(_) => "Conexão em tempo real indisponível".to_string(),
        }
    }
}

impl From<SchemaError> for ClientError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::InvalidAmount(raw) => Self::Validation(format!("Valor inválido: {raw}")),
            other => Self::InvalidResponse(other.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
