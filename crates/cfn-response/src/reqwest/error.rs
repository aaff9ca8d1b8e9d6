//! Error types for reqwest-based delivery.

use thiserror::Error;

/// Result type alias for reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    /// Short classification used in log output.
    pub fn failure(&self) -> &'static str {
        match self {
            Self::Reqwest(e) if e.is_timeout() => "timeout",
            Self::Reqwest(e) if e.is_connect() => "connect",
            Self::Reqwest(e) if e.is_builder() => "builder",
            Self::Reqwest(e) if e.is_body() || e.is_decode() => "body",
            Self::Reqwest(_) => "request",
        }
    }
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        crate::Error::transport(err)
    }
}
