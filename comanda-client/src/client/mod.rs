//! Client module - REST access to the backend.

pub mod api;
pub mod http;

// Re-export main types
pub use api::ApiClient;
pub use http::{HttpClient, NetworkHttpClient};
