#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod document;
mod error;
mod reporter;
mod request;
mod status;
mod transport;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use config::{LogLevel, ReporterConfig, TransportConfig};
pub use document::{DATA_WRAP_KEY, StatusDocument};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use reporter::{ResponseReporter, Resolution};
#[cfg(feature = "reqwest")]
pub use reporter::{configure, default_reporter};
pub use request::{LogContext, RequestContext, RequestType};
pub use status::{Reason, ResponseData, Status, StatusDetails};
pub use transport::{CONTENT_TYPE_VALUE, ResponseReceipt, ResponseRequest, ResponseTransport};

/// Tracing target for status reporting.
pub const TRACING_TARGET: &str = "cfn_response::reporter";

/// Physical resource id sent when neither the caller nor the request has one.
pub const DEFAULT_PHYSICAL_RESOURCE_ID: &str = "NOIDPROVIDED";

/// Prefix of the failure reason that points at the handler's log stream.
pub const DEFAULT_REASON_WITH_CONTEXT: &str = "Details in CloudWatch Log Stream: ";

/// Failure reason sent when none was provided and no log stream is known.
pub const DEFAULT_REASON: &str = "WARNING: Reason not properly provided for failure";
