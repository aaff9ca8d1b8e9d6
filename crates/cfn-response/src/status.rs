//! Caller-supplied status details.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

use crate::BoxedError;

/// Normalized payload attached to a status document.
pub type ResponseData = Map<String, Value>;

/// Outcome of the custom resource operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// The operation completed.
    Success,
    /// The operation failed.
    Failed,
}

/// Why an operation failed.
///
/// The orchestrator only accepts text, so every variant has a string form:
/// text is sent as-is, errors as their diagnostic trace and any other value
/// as its JSON text.
pub enum Reason {
    /// Plain message.
    Text(String),
    /// Error raised by the handler.
    Error(BoxedError),
    /// Arbitrary structured value.
    Value(Value),
}

impl Reason {
    /// Wraps an error raised by the handler.
    pub fn error(error: impl Into<BoxedError>) -> Self {
        Self::Error(error.into())
    }

    /// Returns whether the reason carries anything worth sending.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Error(_) => true,
            Self::Value(value) => is_truthy(value),
        }
    }

    /// Converts the reason into the text placed in the status document.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Error(error) => diagnostic_trace(&*error),
            Self::Value(Value::String(text)) => text,
            Self::Value(value) => value.to_string(),
        }
    }
}

impl fmt::Debug for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Error(error) => f.debug_tuple("Error").field(&error.to_string()).finish(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl From<String> for Reason {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Reason {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Value> for Reason {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Renders an error followed by every cause in its source chain.
fn diagnostic_trace(error: &(dyn std::error::Error + 'static)) -> String {
    let mut trace = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        trace.push_str("\n    caused by: ");
        trace.push_str(&cause.to_string());
        source = cause.source();
    }
    trace
}

/// Loose truthiness used for optional document fields.
///
/// `null`, `false`, zero and the empty string count as absent.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Fields the handler supplies to describe its outcome.
#[derive(Debug)]
pub struct StatusDetails {
    /// Outcome of the operation.
    pub status: Status,
    /// Failure explanation; ignored by the orchestrator on success.
    pub reason: Option<Reason>,
    /// Identifier of the provisioned resource.
    pub physical_resource_id: Option<String>,
    /// Output attributes; scalars are wrapped before sending.
    pub data: Option<Value>,
}

impl StatusDetails {
    /// Creates details with the given status and nothing else.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            reason: None,
            physical_resource_id: None,
            data: None,
        }
    }

    /// Creates SUCCESS details.
    pub fn success() -> Self {
        Self::new(Status::Success)
    }

    /// Creates FAILED details with the given reason.
    pub fn failed(reason: impl Into<Reason>) -> Self {
        Self::new(Status::Failed).with_reason(reason)
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<Reason>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the physical resource id.
    pub fn with_physical_resource_id(mut self, physical_resource_id: impl Into<String>) -> Self {
        self.physical_resource_id = Some(physical_resource_id.into());
        self
    }

    /// Sets the data payload.
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }
}
