//! Atomicwork API client implementation.

use async_trait::async_trait;
use atomicwork_core::{ApiRequest, Config, Error, HttpMethod, Result, TicketApi};
use serde_json::Value;
use tracing::{debug, warn};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Atomicwork API client.
pub struct AtomicworkClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AtomicworkClient {
    /// Create a client from the resolved configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_base_url(
            config.base_url.as_str(),
            config.api_key.clone().unwrap_or_default(),
        )
    }

    /// Create a client against an explicit base URL (also used by tests).
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("atomicwork-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build request with common headers.
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, &self.api_key)
    }

    /// Handle response and map errors.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(
                status = status_code,
                message = message,
                "Atomicwork API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        response
            .json()
            .await
            .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl TicketApi for AtomicworkClient {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let url = format!("{}{}", self.base_url, request.endpoint);

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        debug!(method = %method, url = url, "Atomicwork request");

        let mut builder = self.request(method, &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        self.handle_response(response).await
    }
}
