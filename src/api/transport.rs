//! HTTP transport used by the API client.
//!
//! The client only needs "GET this URL with this token"; keeping that behind
//! a trait lets tests count upstream calls without a network.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration as StdDuration;

use crate::constants::api::REQUEST_TIMEOUT_SECS;
use crate::error::{Error, Result};

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase for the status.
    pub reason: String,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// A 200 response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, reason: "OK".to_string(), body: body.into() }
    }
}

/// Issues authenticated GET requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with `Authorization: Bearer {token}` and `Accept: application/json`.
    ///
    /// Only network-level failures are errors; any HTTP status is a response.
    async fn get(&self, url: &str, token: &str) -> Result<RawResponse>;
}

/// [`Transport`] backed by `reqwest` with a fixed request timeout.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the standard timeout.
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, token: &str) -> Result<RawResponse> {
        let resp = self.client
            .get(url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Request to {url} failed: {e}")))?;

        let status = resp.status();
        let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
        let body = resp.text().await
            .map_err(|e| Error::Transport(format!("Reading response from {url} failed: {e}")))?;

        Ok(RawResponse { status: status.as_u16(), reason, body })
    }
}
