//! Inbound provisioning event and invocation context types.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Lifecycle operation the orchestrator asked the handler to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
pub enum RequestType {
    /// The resource is being created.
    Create,
    /// The resource is being updated.
    Update,
    /// The resource is being deleted.
    Delete,
}

/// The provisioning event the status report answers.
///
/// Deserializes directly from the event payload delivered to the handler.
/// The response URL is kept verbatim and only validated when a report is sent.
///
/// # Examples
///
/// ```rust
/// use cfn_response::RequestContext;
///
/// let context = RequestContext::new(
///     "arn:aws:cloudformation:us-east-1:123456789012:stack/demo/f3a936",
///     "c4dd7439",
///     "TestResource",
///     "https://example.com/resp?sig=abc",
/// )
/// .with_physical_resource_id("res-12345");
///
/// assert_eq!(context.physical_resource_id.as_deref(), Some("res-12345"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestContext {
    /// Operation being performed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<RequestType>,
    /// Pre-signed destination for the status document.
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    /// Stack the resource belongs to.
    pub stack_id: String,
    /// Correlation id of this request.
    pub request_id: String,
    /// Logical name of the resource in the template.
    pub logical_resource_id: String,
    /// Identifier reported for this resource by a previous operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    /// Template type of the custom resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Handler endpoint the orchestrator invoked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_token: Option<String>,
    /// Properties declared for the resource.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub resource_properties: serde_json::Value,
    /// Properties before an update.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub old_resource_properties: serde_json::Value,
}

impl RequestContext {
    /// Creates a context with the fields every report needs.
    pub fn new(
        stack_id: impl Into<String>,
        request_id: impl Into<String>,
        logical_resource_id: impl Into<String>,
        response_url: impl Into<String>,
    ) -> Self {
        Self {
            request_type: None,
            response_url: response_url.into(),
            stack_id: stack_id.into(),
            request_id: request_id.into(),
            logical_resource_id: logical_resource_id.into(),
            physical_resource_id: None,
            resource_type: None,
            service_token: None,
            resource_properties: serde_json::Value::Null,
            old_resource_properties: serde_json::Value::Null,
        }
    }

    /// Parses a context from a raw event document.
    pub fn from_json(event: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(event)?)
    }

    /// Sets the request type.
    pub fn with_request_type(mut self, request_type: RequestType) -> Self {
        self.request_type = Some(request_type);
        self
    }

    /// Sets the previously reported physical resource id.
    pub fn with_physical_resource_id(mut self, physical_resource_id: impl Into<String>) -> Self {
        self.physical_resource_id = Some(physical_resource_id.into());
        self
    }

    /// Returns the prior physical resource id when it is non-empty.
    pub fn prior_physical_resource_id(&self) -> Option<&str> {
        self.physical_resource_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

/// Runtime invocation context of the handler, used for default failure reasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogContext {
    /// Log stream the handler writes to.
    pub log_stream_name: String,
}

impl LogContext {
    /// Creates a new log context.
    pub fn new(log_stream_name: impl Into<String>) -> Self {
        Self {
            log_stream_name: log_stream_name.into(),
        }
    }
}
