//! services/app/src/adapters/http.rs
//!
//! This module contains the adapter for the remote story service's HTTP API.
//! It implements the `HttpTransport` port from the `core` crate using `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use storyteller_core::ports::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, PortError, PortResult};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `HttpTransport` port with a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a new `ReqwestTransport` rooted at `base_url`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// JSON when possible, the raw text otherwise, `null` for an empty body.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

//=========================================================================================
// `HttpTransport` Trait Implementation
//=========================================================================================

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> PortResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(to_method(request.method), &url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        // Only failures to get a response are errors here; statuses are mapped by the core.
        let response = builder
            .send()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;
        debug!(%url, status, "Received response");

        Ok(ApiResponse {
            status,
            body: parse_body(&text),
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
