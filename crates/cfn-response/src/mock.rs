//! Recording transport for tests.
//!
//! Captures every request instead of sending it and answers with a canned
//! receipt or a transport failure.
//!
//! # Feature Flag
//!
//! Outside of this crate's own tests the module requires the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! cfn-response = { version = "...", features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use jiff::Timestamp;

use crate::{Error, ResponseReceipt, ResponseRequest, ResponseTransport, Result};

/// Canned answer returned by a [`RecordingTransport`].
#[derive(Debug, Clone)]
enum Answer {
    Status(u16),
    Unreachable(String),
}

/// Transport double that records requests.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<ResponseRequest>>>,
    answer: Answer,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::with_status(200)
    }
}

impl RecordingTransport {
    /// Creates a transport that answers every request with `status_code`.
    pub fn with_status(status_code: u16) -> Self {
        Self {
            requests: Arc::default(),
            answer: Answer::Status(status_code),
        }
    }

    /// Creates a transport whose requests never reach the destination.
    pub fn unreachable(cause: impl Into<String>) -> Self {
        Self {
            requests: Arc::default(),
            answer: Answer::Unreachable(cause.into()),
        }
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<ResponseRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the body of the most recent request as JSON.
    pub fn last_document(&self) -> Option<serde_json::Value> {
        let requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        let request = requests.last()?;
        serde_json::from_slice(&request.body).ok()
    }
}

#[async_trait::async_trait]
impl ResponseTransport for RecordingTransport {
    async fn put(&self, request: &ResponseRequest) -> Result<ResponseReceipt> {
        let started_at = Timestamp::now();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        match &self.answer {
            Answer::Status(status_code) => {
                let receipt = ResponseReceipt::new(*status_code, started_at);
                Ok(if request.capture_body {
                    receipt.with_body("")
                } else {
                    receipt
                })
            }
            Answer::Unreachable(cause) => Err(Error::transport(cause.clone())),
        }
    }
}
