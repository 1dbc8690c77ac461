//! Seam between tool handlers and the HTTP layer.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// HTTP verbs used against the Atomicwork API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A single outbound API call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path plus query string, e.g. `/requests/ITREQ-1`.
    pub endpoint: String,
    /// JSON body, sent only with POST.
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            endpoint: endpoint.into(),
            body: None,
        }
    }

    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            endpoint: endpoint.into(),
            body: Some(body),
        }
    }
}

/// Anything that can execute an [`ApiRequest`] and hand back the JSON body.
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// Send the request and return the parsed JSON response.
    ///
    /// Non-2xx responses become [`crate::Error::Api`], transport failures
    /// become [`crate::Error::Connection`].
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}
