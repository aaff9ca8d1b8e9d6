//! Status reporter with dual result delivery.

use std::fmt;
#[cfg(feature = "reqwest")]
use std::sync::OnceLock;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use url::Url;

use crate::{
    DEFAULT_PHYSICAL_RESOURCE_ID, DEFAULT_REASON, DEFAULT_REASON_WITH_CONTEXT, Error, ErrorKind,
    LogContext, Reason, ReporterConfig, RequestContext, ResponseData, ResponseRequest,
    ResponseTransport, Result, Status, StatusDetails, StatusDocument, TRACING_TARGET,
};

/// What a report resolves to when no sink is supplied.
///
/// A FAILED report is not an error of the reporter: it resolves to
/// [`Resolution::Failed`] carrying the normalized reason, while precondition
/// and transport errors are returned as `Err`.
#[derive(Debug)]
pub enum Resolution {
    /// The document was delivered with status SUCCESS.
    Succeeded(Option<ResponseData>),
    /// The document was delivered with status FAILED.
    Failed(Error),
}

impl Resolution {
    /// Returns whether the delivered status was SUCCESS.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Returns the normalized data of a successful report.
    pub fn data(&self) -> Option<&ResponseData> {
        match self {
            Self::Succeeded(data) => data.as_ref(),
            Self::Failed(_) => None,
        }
    }

    /// Returns the application failure of a FAILED report.
    pub fn failure(&self) -> Option<&Error> {
        match self {
            Self::Succeeded(_) => None,
            Self::Failed(error) => Some(error),
        }
    }

    /// Folds the resolution back into a plain result.
    pub fn into_result(self) -> Result<Option<ResponseData>> {
        match self {
            Self::Succeeded(data) => Ok(data),
            Self::Failed(error) => Err(error),
        }
    }
}

/// Builds, sends and resolves status reports.
///
/// Every entry point comes in two forms: the plain one returns a
/// [`Resolution`], the `_with_sink` one hands `(error, data)` to an
/// error-first callback and returns whatever the callback returns.
///
/// # Examples
///
/// ```rust,ignore
/// use cfn_response::{ReporterConfig, RequestContext, ResponseReporter};
///
/// let reporter = ResponseReporter::with_reqwest(ReporterConfig::default())?;
/// let context = RequestContext::from_json(&event)?;
///
/// let resolution = reporter
///     .report_success("bucket-1234", None, Some(&context))
///     .await?;
/// ```
#[derive(Clone)]
pub struct ResponseReporter {
    transport: Arc<dyn ResponseTransport>,
    config: ReporterConfig,
}

impl fmt::Debug for ResponseReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseReporter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ResponseReporter {
    /// Creates a reporter that delivers through the given transport.
    pub fn new<T>(transport: T, config: ReporterConfig) -> Self
    where
        T: ResponseTransport + 'static,
    {
        Self {
            transport: Arc::new(transport),
            config,
        }
    }

    /// Creates a reporter backed by the reqwest transport.
    #[cfg(feature = "reqwest")]
    #[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
    pub fn with_reqwest(config: ReporterConfig) -> Result<Self> {
        let transport = crate::reqwest::ReqwestTransport::new(config.transport.clone())?;
        Ok(Self::new(transport, config))
    }

    /// Gets the reporter configuration.
    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Sends a status report.
    ///
    /// # Errors
    ///
    /// Returns an error when the context or details are missing, the response
    /// URL is malformed or the document could not be delivered.
    pub async fn report(
        &self,
        details: Option<StatusDetails>,
        context: Option<&RequestContext>,
    ) -> Result<Resolution> {
        match self.dispatch(details, context).await {
            Ok(data) => Ok(Resolution::Succeeded(data)),
            Err(error) if error.kind() == ErrorKind::ApplicationFailure => {
                Ok(Resolution::Failed(error))
            }
            Err(error) => Err(error),
        }
    }

    /// Sends a status report and routes every outcome through `sink`.
    ///
    /// The sink receives `(None, data)` on success and `(Some(error), None)`
    /// for any failure, including a FAILED report.
    pub async fn report_with_sink<F, T>(
        &self,
        details: Option<StatusDetails>,
        context: Option<&RequestContext>,
        sink: F,
    ) -> T
    where
        F: FnOnce(Option<Error>, Option<ResponseData>) -> T,
    {
        match self.dispatch(details, context).await {
            Ok(data) => sink(None, data),
            Err(error) => sink(Some(error), None),
        }
    }

    /// Sends a SUCCESS report.
    pub async fn report_success(
        &self,
        physical_resource_id: impl Into<String>,
        data: Option<Value>,
        context: Option<&RequestContext>,
    ) -> Result<Resolution> {
        let details = Self::success_details(physical_resource_id.into(), data);
        self.report(Some(details), context).await
    }

    /// Sends a SUCCESS report and routes the outcome through `sink`.
    pub async fn report_success_with_sink<F, T>(
        &self,
        physical_resource_id: impl Into<String>,
        data: Option<Value>,
        context: Option<&RequestContext>,
        sink: F,
    ) -> T
    where
        F: FnOnce(Option<Error>, Option<ResponseData>) -> T,
    {
        let details = Self::success_details(physical_resource_id.into(), data);
        self.report_with_sink(Some(details), context, sink).await
    }

    /// Sends a FAILED report.
    ///
    /// Without a reason, the log stream of `log_context` is referenced, or a
    /// generic warning is sent. Without a physical resource id, the request's
    /// prior id is reused, or [`DEFAULT_PHYSICAL_RESOURCE_ID`] is sent.
    pub async fn report_failure(
        &self,
        reason: Option<Reason>,
        context: Option<&RequestContext>,
        log_context: Option<&LogContext>,
        physical_resource_id: Option<String>,
    ) -> Result<Resolution> {
        let details = self.failure_details(reason, context, log_context, physical_resource_id);
        self.report(Some(details), context).await
    }

    /// Sends a FAILED report and routes the outcome through `sink`.
    pub async fn report_failure_with_sink<F, T>(
        &self,
        reason: Option<Reason>,
        context: Option<&RequestContext>,
        log_context: Option<&LogContext>,
        physical_resource_id: Option<String>,
        sink: F,
    ) -> T
    where
        F: FnOnce(Option<Error>, Option<ResponseData>) -> T,
    {
        let details = self.failure_details(reason, context, log_context, physical_resource_id);
        self.report_with_sink(Some(details), context, sink).await
    }

    fn success_details(physical_resource_id: String, data: Option<Value>) -> StatusDetails {
        StatusDetails {
            status: Status::Success,
            reason: Some(Reason::Text(String::new())),
            physical_resource_id: Some(physical_resource_id),
            data,
        }
    }

    fn failure_details(
        &self,
        reason: Option<Reason>,
        context: Option<&RequestContext>,
        log_context: Option<&LogContext>,
        physical_resource_id: Option<String>,
    ) -> StatusDetails {
        let reason = reason
            .filter(Reason::is_present)
            .unwrap_or_else(|| match log_context {
                Some(log_context) => Reason::Text(format!(
                    "{DEFAULT_REASON_WITH_CONTEXT}{}",
                    log_context.log_stream_name
                )),
                None => Reason::Text(DEFAULT_REASON.to_owned()),
            });

        let physical_resource_id = physical_resource_id
            .filter(|id| !id.is_empty())
            .or_else(|| {
                context
                    .and_then(RequestContext::prior_physical_resource_id)
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| DEFAULT_PHYSICAL_RESOURCE_ID.to_owned());

        if self.config.log_level.is_debug() {
            tracing::info!(
                target: TRACING_TARGET,
                physical_resource_id = %physical_resource_id,
                "Resolved physical resource id"
            );
        }

        StatusDetails {
            status: Status::Failed,
            reason: Some(reason),
            physical_resource_id: Some(physical_resource_id),
            data: None,
        }
    }

    /// Runs a report to completion and logs how it ended.
    async fn dispatch(
        &self,
        details: Option<StatusDetails>,
        context: Option<&RequestContext>,
    ) -> Result<Option<ResponseData>> {
        let started_at = Instant::now();

        if self.config.log_level.is_verbose() {
            tracing::info!(
                target: TRACING_TARGET,
                details = ?details,
                context = ?context,
                "Reporting custom resource status"
            );
        }

        let result = self.send(details, context).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(_) => {}
            Err(error) if error.kind() == ErrorKind::ApplicationFailure => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    reason = error.message().unwrap_or_default(),
                    elapsed_ms = elapsed.as_millis(),
                    "Custom resource reported as failed"
                );
            }
            Err(error) if self.config.log_level.is_debug() => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = ?error,
                    elapsed_ms = elapsed.as_millis(),
                    "Status report error"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Status report error"
                );
            }
        }

        result
    }

    async fn send(
        &self,
        details: Option<StatusDetails>,
        context: Option<&RequestContext>,
    ) -> Result<Option<ResponseData>> {
        let context = context.ok_or_else(Error::missing_context)?;
        let details = details.ok_or_else(Error::missing_details)?;
        let verbose = self.config.log_level.is_verbose();

        let document = StatusDocument::build(details, context);
        let body = document.to_body()?;
        let url = Url::parse(&context.response_url).map_err(Error::malformed_destination)?;
        let request = ResponseRequest::new(url, body).with_capture_body(verbose);

        if verbose {
            tracing::info!(
                target: TRACING_TARGET,
                method = "PUT",
                url = %request.url,
                headers = ?request.headers(),
                document = %String::from_utf8_lossy(&request.body),
                "Outbound status document"
            );
        }

        let receipt = self.transport.put(&request).await?;

        tracing::info!(
            target: TRACING_TARGET,
            status_code = receipt.status_code,
            "Response sent"
        );

        if verbose {
            tracing::info!(
                target: TRACING_TARGET,
                status_code = receipt.status_code,
                headers = ?receipt.headers,
                body = receipt.body.as_deref().unwrap_or_default(),
                "Destination response"
            );
        }

        if !receipt.is_success() {
            tracing::warn!(
                target: TRACING_TARGET,
                status_code = receipt.status_code,
                "Destination answered with a non-success status"
            );
        }

        document.into_outcome()
    }
}

#[cfg(feature = "reqwest")]
static DEFAULT_REPORTER: OnceLock<ResponseReporter> = OnceLock::new();

/// Configures the process-wide default reporter.
///
/// The first call wins; later calls log a warning and return the reporter
/// that is already installed.
#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub fn configure(config: ReporterConfig) -> Result<&'static ResponseReporter> {
    if let Some(reporter) = DEFAULT_REPORTER.get() {
        tracing::warn!(
            target: TRACING_TARGET,
            "Default reporter already configured, ignoring new configuration"
        );
        return Ok(reporter);
    }

    let reporter = ResponseReporter::with_reqwest(config)?;
    Ok(DEFAULT_REPORTER.get_or_init(|| reporter))
}

/// Returns the process-wide default reporter, configuring it with defaults
/// if [`configure`] was never called.
#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub fn default_reporter() -> Result<&'static ResponseReporter> {
    match DEFAULT_REPORTER.get() {
        Some(reporter) => Ok(reporter),
        None => configure(ReporterConfig::default()),
    }
}
