//! Reqwest-backed [`HttpClient`]

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpRequest, HttpResponse},
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Whole-request timeout; the core itself never times a lookup out.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Desktop HTTP transport: rustls, pooled connections, one attempt per call.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::try_with_timeout(DEFAULT_TIMEOUT).unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default reqwest client");
            Self {
                client: Client::new(),
            }
        })
    }

    pub fn try_with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .user_agent(concat!("bookshelf-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                BridgeError::OperationFailed(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(url = %request.url, "GET");

        let builder = request
            .headers
            .iter()
            .fold(self.client.get(&request.url), |builder, (name, value)| {
                builder.header(name, value)
            });

        let response = builder.send().await.map_err(|e| {
            let kind = if e.is_timeout() {
                "timed out"
            } else if e.is_connect() {
                "connection failed"
            } else {
                "failed"
            };
            warn!(url = %request.url, error = %e, "HTTP request {}", kind);
            BridgeError::OperationFailed(format!("HTTP request {}: {}", kind, e))
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            BridgeError::OperationFailed(format!("Failed to read response body: {}", e))
        })?;

        debug!(status, bytes = body.len(), "HTTP response received");
        Ok(HttpResponse::new(status, body))
    }
}
