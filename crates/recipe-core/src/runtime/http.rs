use async_trait::async_trait;

use crate::error::TransportError;

/// Response as seen by the adapters: status, reason phrase and raw body text.
///
/// Non-2xx statuses are ordinary responses here; only connection-level failures
/// become a [`TransportError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// e.g. `HTTP 500 Internal Server Error`
    pub fn status_line(&self) -> String {
        if self.reason.is_empty() {
            format!("HTTP {}", self.status)
        } else {
            format!("HTTP {} {}", self.status, self.reason)
        }
    }
}

/// HTTP client abstraction for making requests
/// Implementations must be Send + Sync for use across async boundaries
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request to the specified URL
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    /// Perform a POST request with a JSON body
    async fn post_json(&self, url: &str, body: &str) -> Result<HttpResponse, TransportError>;
}
