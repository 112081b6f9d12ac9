//! Client configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::{ClientError, ClientResult};

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            Self::Development => "http://localhost:5001",
            Self::Staging => "https://staging-api.comandas.com",
            Self::Production => "https://api.comandas.com",
        }
    }

    fn default_log_level(&self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Staging => "info",
            Self::Production => "warn",
        }
    }
}

impl FromStr for Environment {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" | "stage" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ClientError::Config(format!("unknown environment: {other}"))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | COMANDA_ENV | development | development, staging or production |
/// | COMANDA_API_BASE_URL | per environment | REST base URL (without `/api`) |
/// | COMANDA_SOCKET_URL | same as API | socket channel base URL |
/// | COMANDA_LOG_LEVEL | debug / info / warn | tracing filter |
/// | COMANDA_DEBUG | true in development | verbose request logging |
/// | COMANDA_REAL_TIME_UPDATES | true | `false` disables the socket channel |
/// | COMANDA_REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
///
/// A `.env` file in the working directory is loaded first.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,
    /// REST base URL, e.g. `http://localhost:5001`
    pub api_base_url: String,
    /// Socket channel base URL
    pub socket_url: String,
    pub log_level: String,
    pub debug: bool,
    /// Live updates over the socket channel
    pub real_time_updates: bool,
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Defaults for an environment
    pub fn new(environment: Environment) -> Self {
        let base = environment.default_base_url();
        Self {
            environment,
            api_base_url: base.to_string(),
            socket_url: base.to_string(),
            log_level: environment.default_log_level().to_string(),
            debug: environment == Environment::Development,
            real_time_updates: true,
            request_timeout: Duration::from_millis(30_000),
        }
    }

    /// Load from the process environment (and `.env`)
    pub fn from_env() -> Self {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("COMANDA_ENV") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}, falling back to development");
                Environment::Development
            }),
            None => Environment::Development,
        };

        let mut config = Self::new(environment);
        if let Some(url) = lookup("COMANDA_API_BASE_URL").filter(|v| !v.is_empty()) {
            // Socket follows the API unless set separately
            config.socket_url = url.clone();
            config.api_base_url = url;
        }
        if let Some(url) = lookup("COMANDA_SOCKET_URL").filter(|v| !v.is_empty()) {
            config.socket_url = url;
        }
        if let Some(level) = lookup("COMANDA_LOG_LEVEL").filter(|v| !v.is_empty()) {
            config.log_level = level;
        }
        if let Some(debug) = lookup("COMANDA_DEBUG") {
            config.debug = debug == "true";
        }
        if let Some(flag) = lookup("COMANDA_REAL_TIME_UPDATES") {
            config.real_time_updates = flag != "false";
        }
        if let Some(ms) = lookup("COMANDA_REQUEST_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            config.request_timeout = Duration::from_millis(ms);
        }
        config
    }

    /// Set the REST base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the socket base URL
    pub fn with_socket_url(mut self, url: impl Into<String>) -> Self {
        self.socket_url = url.into();
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable or disable the socket channel
    pub fn with_real_time_updates(mut self, enabled: bool) -> Self {
        self.real_time_updates = enabled;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Join the base URL and an endpoint with exactly one slash
    pub fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Socket.IO websocket endpoint derived from `socket_url`
    pub fn socket_endpoint(&self) -> ClientResult<String> {
        let base = self.socket_url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else if base.starts_with("ws://") || base.starts_with("wss://") {
            base.to_string()
        } else {
            return Err(ClientError::Config(format!(
                "unsupported socket url: {}",
                self.socket_url
            )));
        };
        Ok(format!("{ws_base}/socket.io/?EIO=4&transport=websocket"))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Environment::Development)
    }
}
