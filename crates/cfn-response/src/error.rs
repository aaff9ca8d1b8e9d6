//! Structured error handling for status reporting.

use hipstr::HipStr;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while reporting a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// No request context was supplied.
    MissingContext,
    /// No status details were supplied.
    MissingDetails,
    /// The response URL could not be parsed.
    MalformedDestination,
    /// The status document could not be delivered.
    Transport,
    /// A JSON document could not be (de)serialized.
    Serialization,
    /// The report itself was FAILED; the message carries the reason.
    ApplicationFailure,
}

impl ErrorKind {
    /// Returns whether this kind aborts the report rather than describing it.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::ApplicationFailure)
    }
}

/// Structured error type with classification and an optional cause.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<HipStr<'static>>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<HipStr<'static>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Raised when the caller supplied no request context.
    pub fn missing_context() -> Self {
        Self::new(ErrorKind::MissingContext)
            .with_message("CRITICAL: no request context, cannot send response")
    }

    /// Raised when the caller supplied no status details.
    pub fn missing_details() -> Self {
        Self::new(ErrorKind::MissingDetails)
            .with_message("CRITICAL: no status details, cannot send response")
    }

    /// Wraps a URL parser failure.
    pub fn malformed_destination(source: url::ParseError) -> Self {
        Self::new(ErrorKind::MalformedDestination)
            .with_message(format!("CRITICAL: Error parsing URL due to: [{source}]"))
            .with_source(source)
    }

    /// Wraps a transport failure (connection, DNS, TLS, timeout).
    pub fn transport(source: impl Into<BoxedError>) -> Self {
        let source = source.into();
        Self::new(ErrorKind::Transport)
            .with_message(format!("CRITICAL: Error sending response due to: [{source}]"))
            .with_source(source)
    }

    /// Carries the normalized reason of a FAILED report.
    pub fn application_failure(reason: impl Into<HipStr<'static>>) -> Self {
        Self::new(ErrorKind::ApplicationFailure).with_message(reason)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the primary message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Check if this error aborted the report based on its kind.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::from_source(ErrorKind::Serialization, error)
            .with_message("JSON (de)serialization failed")
    }
}
