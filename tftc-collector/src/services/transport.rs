//! HTTP transport behind the Riot client
//!
//! `RiotClient` owns rate limiting, retries and status classification; the
//! transport only performs one GET and reports status, `Retry-After` and body.
//! Tests substitute a scripted transport.

use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use std::time::Duration;
use tftc_common::{Error, Result};

/// Header carrying the API credential
pub const API_KEY_HEADER: &str = "X-Riot-Token";

const USER_AGENT: &str = concat!("tftc-collector/", env!("CARGO_PKG_VERSION"));

/// Raw response of a single attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    /// Raw `Retry-After` header value, if any
    pub retry_after: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    pub fn with_retry_after(mut self, value: impl Into<String>) -> Self {
        self.retry_after = Some(value.into());
        self
    }
}

/// One GET against the remote API
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> std::result::Result<ApiResponse, FetchError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> std::result::Result<ApiResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                endpoint: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(|e| FetchError::Network {
            endpoint: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(ApiResponse {
            status,
            retry_after,
            body,
        })
    }
}
