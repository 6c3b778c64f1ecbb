//! Outbound HTTP
//!
//! The core only ever issues plain `GET` requests and reads the status and
//! the whole body, so that is all this seam carries. Transport concerns
//! (TLS, connection reuse, timeouts) belong to the implementation.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// A `GET` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status code plus the complete response body
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Host-provided HTTP transport
///
/// `execute` sends the request exactly once. A non-2xx status is a response,
/// not an error; errors are reserved for requests that got no response at
/// all.
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest};
///
/// async fn fetch(client: &dyn HttpClient) -> bridge_traits::error::Result<u16> {
///     let request = HttpRequest::get("https://books.example.org/v1/volumes?q=dune");
///     Ok(client.execute(request).await?.status)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}
