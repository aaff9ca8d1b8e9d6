//! Transport seam for delivering status documents.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;

/// Value of the `content-type` header expected by the pre-signed destination.
pub const CONTENT_TYPE_VALUE: &str = "";

/// Core trait for delivering a status document.
///
/// Implement this trait to plug in a different HTTPS client.
#[async_trait::async_trait]
pub trait ResponseTransport: Send + Sync {
    /// PUTs the request body to its destination.
    ///
    /// When [`ResponseRequest::capture_body`] is set, the response body must be
    /// read to the end before returning; otherwise returning once headers
    /// arrive is sufficient. Failures to reach the destination are reported as
    /// [`ErrorKind::Transport`](crate::ErrorKind::Transport) errors.
    async fn put(&self, request: &ResponseRequest) -> Result<ResponseReceipt>;
}

/// A single PUT of a serialized status document.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRequest {
    /// Parsed destination.
    pub url: Url,
    /// Serialized status document.
    pub body: Vec<u8>,
    /// Whether the response body should be read and returned.
    pub capture_body: bool,
}

impl ResponseRequest {
    /// Creates a new request.
    pub fn new(url: Url, body: Vec<u8>) -> Self {
        Self {
            url,
            body,
            capture_body: false,
        }
    }

    /// Sets whether the response body is captured.
    pub fn with_capture_body(mut self, capture_body: bool) -> Self {
        self.capture_body = capture_body;
        self
    }

    /// Headers sent with the request.
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            ("content-type", CONTENT_TYPE_VALUE.to_owned()),
            ("content-length", self.body.len().to_string()),
        ]
    }
}

/// What the destination answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseReceipt {
    /// HTTP status code returned by the destination.
    pub status_code: u16,
    /// Response headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Response body, when captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Timestamp when the request was initiated.
    pub started_at: Timestamp,
    /// Timestamp when the response completed.
    pub finished_at: Timestamp,
}

impl ResponseReceipt {
    /// Creates a receipt for a response that completed now.
    pub fn new(status_code: u16, started_at: Timestamp) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
            body: None,
            started_at,
            finished_at: Timestamp::now(),
        }
    }

    /// Sets the response headers.
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the captured body and marks the receipt finished.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.finished_at = Timestamp::now();
        self
    }

    /// Returns whether the destination accepted the document (2xx status code).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Calculates the response time as a duration.
    pub fn duration(&self) -> jiff::Span {
        self.started_at.until(self.finished_at).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_headers() {
        let url = Url::parse("https://example.com/resp?sig=1").unwrap();
        let request = ResponseRequest::new(url, "{\"Status\":\"SUCCESS\"}".into());

        let [content_type, content_length] = request.headers();
        assert_eq!(content_type, ("content-type", String::new()));
        assert_eq!(content_length, ("content-length", "20".to_owned()));
        assert!(!request.capture_body);
    }

    #[test]
    fn test_content_length_counts_bytes() {
        let url = Url::parse("https://example.com/").unwrap();
        let request = ResponseRequest::new(url, "\"é\"".into());
        assert_eq!(request.headers()[1].1, "4");
    }

    #[test]
    fn test_receipt_success() {
        let started_at = Timestamp::now();

        assert!(ResponseReceipt::new(200, started_at).is_success());
        assert!(ResponseReceipt::new(204, started_at).is_success());
        assert!(!ResponseReceipt::new(403, started_at).is_success());
        assert!(!ResponseReceipt::new(500, started_at).is_success());
    }

    #[test]
    fn test_receipt_body() {
        let receipt = ResponseReceipt::new(200, Timestamp::now()).with_body("ok");
        assert_eq!(receipt.body.as_deref(), Some("ok"));
        assert!(receipt.finished_at >= receipt.started_at);
    }
}
