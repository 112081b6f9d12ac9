// comanda-client/src/client/http.rs
// HTTP transport

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Serialize;
use serde_json::Value;
use shared::response::error_message;

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP transport trait
///
/// Bodies come back as raw JSON; envelope handling lives in [`ApiClient`].
///
/// [`ApiClient`]: super::ApiClient
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, path: &str) -> ClientResult<Value>;
    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<Value>;
    async fn post_empty(&self, path: &str) -> ClientResult<Value>;
    async fn put<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<Value>;
    async fn delete(&self, path: &str) -> ClientResult<Value>;
}

/// Network HTTP client (reqwest)
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    config: ClientConfig,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    async fn send(
        &self,
        method: http::Method,
        path: &str,
        req: reqwest::RequestBuilder,
    ) -> ClientResult<Value> {
        if self.config.debug {
            tracing::debug!(%method, path, "HTTP request");
        }
        let response = req.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "HTTP request failed");
            ClientError::Network(e)
        })?;
        handle_response(&method, path, response).await
    }
}

/// Map a response to a JSON body or a [`ClientError`]
async fn handle_response(
    method: &http::Method,
    path: &str,
    response: reqwest::Response,
) -> ClientResult<Value> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = error_message(&text).unwrap_or_else(|| {
            if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                text.clone()
            }
        });
        tracing::warn!(%method, path, status = status.as_u16(), %message, "API error");
        return Err(ClientError::api(status.as_u16(), message));
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text)
        .map_err(|e| ClientError::InvalidResponse(format!("{method} {path}: {e}")))
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get(&self, path: &str) -> ClientResult<Value> {
        let url = self.config.api_url(path);
        self.send(http::Method::GET, path, self.client.get(&url)).await
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let url = self.config.api_url(path);
        self.send(http::Method::POST, path, self.client.post(&url).json(body))
            .await
    }

    async fn post_empty(&self, path: &str) -> ClientResult<Value> {
        let url = self.config.api_url(path);
        self.send(http::Method::POST, path, self.client.post(&url)).await
    }

    async fn put<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let url = self.config.api_url(path);
        self.send(http::Method::PUT, path, self.client.put(&url).json(body))
            .await
    }

    async fn delete(&self, path: &str) -> ClientResult<Value> {
        let url = self.config.api_url(path);
        self.send(http::Method::DELETE, path, self.client.delete(&url))
            .await
    }
}
