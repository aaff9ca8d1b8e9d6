//! The status document sent to the orchestrator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::status::is_truthy;
use crate::{
    DEFAULT_PHYSICAL_RESOURCE_ID, Error, RequestContext, ResponseData, Result, Status,
    StatusDetails,
};

/// Key under which non-object data is wrapped.
pub const DATA_WRAP_KEY: &str = "data";

/// Normalized body of the PUT request.
///
/// `Reason` and `Data` are omitted from the wire form when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusDocument {
    /// Outcome of the operation.
    pub status: Status,
    /// Failure explanation as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Identifier of the provisioned resource.
    pub physical_resource_id: String,
    /// Stack the resource belongs to.
    pub stack_id: String,
    /// Correlation id of the request being answered.
    pub request_id: String,
    /// Logical name of the resource in the template.
    pub logical_resource_id: String,
    /// Output attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl StatusDocument {
    /// Builds a normalized document from caller details and the request.
    ///
    /// The physical resource id falls back to the request's prior id and then
    /// to [`DEFAULT_PHYSICAL_RESOURCE_ID`].
    pub fn build(details: StatusDetails, context: &RequestContext) -> Self {
        let StatusDetails {
            status,
            reason,
            physical_resource_id,
            data,
        } = details;

        let physical_resource_id = physical_resource_id
            .filter(|id| !id.is_empty())
            .or_else(|| context.prior_physical_resource_id().map(str::to_owned))
            .unwrap_or_else(|| DEFAULT_PHYSICAL_RESOURCE_ID.to_owned());

        Self {
            status,
            reason: reason
                .filter(|reason| reason.is_present())
                .map(|reason| reason.into_text())
                .filter(|text| !text.is_empty()),
            physical_resource_id,
            stack_id: context.stack_id.clone(),
            request_id: context.request_id.clone(),
            logical_resource_id: context.logical_resource_id.clone(),
            data: normalize_data(data),
        }
    }

    /// Serializes the document into the request body.
    pub fn to_body(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Resolves what the caller receives once the document was delivered.
    ///
    /// A FAILED document resolves to an application failure carrying its reason.
    pub fn into_outcome(self) -> Result<Option<ResponseData>> {
        match self.status {
            Status::Success => Ok(self.data),
            Status::Failed => Err(Error::application_failure(
                self.reason.unwrap_or_default(),
            )),
        }
    }
}

/// Drops falsy data and wraps anything that is not an object.
fn normalize_data(data: Option<Value>) -> Option<ResponseData> {
    match data? {
        value if !is_truthy(&value) => None,
        Value::Object(map) => Some(map),
        value => Some(ResponseData::from_iter([(DATA_WRAP_KEY.to_owned(), value)])),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{ErrorKind, Reason};

    fn context() -> RequestContext {
        RequestContext::new(
            "f3a936",
            "c4dd7439",
            "testResource",
            "https://example.com/resp/testing?testId=436",
        )
    }

    #[test]
    fn test_success_document_shape() {
        let details = StatusDetails::success().with_physical_resource_id("12345a");
        let document = StatusDocument::build(details, &context());

        let wire: Value = serde_json::from_slice(&document.to_body().unwrap()).unwrap();
        assert_eq!(
            wire,
            json!({
                "Status": "SUCCESS",
                "PhysicalResourceId": "12345a",
                "StackId": "f3a936",
                "RequestId": "c4dd7439",
                "LogicalResourceId": "testResource"
            })
        );
    }

    #[test]
    fn test_string_data_is_wrapped() {
        let details = StatusDetails::success().with_data("hello");
        let document = StatusDocument::build(details, &context());

        let wire: Value = serde_json::from_slice(&document.to_body().unwrap()).unwrap();
        assert_eq!(wire["Data"], json!({"data": "hello"}));
        let outcome = document.into_outcome().unwrap().unwrap();
        assert_eq!(Value::Object(outcome), json!({"data": "hello"}));
    }

    #[test]
    fn test_array_data_is_wrapped() {
        let details = StatusDetails::success().with_data(json!([1, 2]));
        let document = StatusDocument::build(details, &context());
        assert_eq!(document.data.unwrap()["data"], json!([1, 2]));
    }

    #[test]
    fn test_object_data_is_kept() {
        let details = StatusDetails::success().with_data(json!({"test": "I'm some data"}));
        let document = StatusDocument::build(details, &context());
        assert_eq!(document.data.unwrap()["test"], "I'm some data");
    }

    #[test]
    fn test_falsy_data_is_omitted() {
        for data in [Value::Null, json!(""), json!(0), json!(false)] {
            let details = StatusDetails::success().with_data(data);
            let document = StatusDocument::build(details, &context());
            assert!(document.data.is_none());
        }
    }

    #[test]
    fn test_empty_reason_is_omitted() {
        let details = StatusDetails::success().with_reason("");
        let document = StatusDocument::build(details, &context());

        assert!(document.reason.is_none());
        let wire: Value = serde_json::from_slice(&document.to_body().unwrap()).unwrap();
        assert!(wire.get("Reason").is_none());
    }

    #[test]
    fn test_object_reason_is_stringified() {
        let details = StatusDetails::failed(json!({"ohno": "Something bad happened"}));
        let document = StatusDocument::build(details, &context());

        assert_eq!(
            document.reason.as_deref(),
            Some(r#"{"ohno":"Something bad happened"}"#)
        );
    }

    #[test]
    fn test_physical_resource_id_fallbacks() {
        let prior = context().with_physical_resource_id("prior-id");

        let document = StatusDocument::build(StatusDetails::success(), &prior);
        assert_eq!(document.physical_resource_id, "prior-id");

        let document = StatusDocument::build(StatusDetails::success(), &context());
        assert_eq!(document.physical_resource_id, DEFAULT_PHYSICAL_RESOURCE_ID);

        let details = StatusDetails::success().with_physical_resource_id("explicit");
        let document = StatusDocument::build(details, &prior);
        assert_eq!(document.physical_resource_id, "explicit");
    }

    #[test]
    fn test_failed_outcome_carries_reason() {
        let details = StatusDetails::failed(Reason::from("boom"));
        let error = StatusDocument::build(details, &context())
            .into_outcome()
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::ApplicationFailure);
        assert_eq!(error.message(), Some("boom"));
    }

    #[test]
    fn test_success_without_data_resolves_to_none() {
        let outcome = StatusDocument::build(StatusDetails::success(), &context()).into_outcome();
        assert_eq!(outcome.unwrap(), None);
    }
}
