//! Reqwest-based HTTP client for status delivery.

use std::collections::BTreeMap;
use std::sync::Arc;

use jiff::Timestamp;
use reqwest::Client;

use super::{Error, TRACING_TARGET};
use crate::{ResponseReceipt, ResponseRequest, ResponseTransport, TransportConfig};

/// Inner transport that holds the HTTP client and configuration.
struct ReqwestTransportInner {
    http: Client,
    config: TransportConfig,
}

/// Reqwest-based HTTPS transport that PUTs status documents to their destination.
///
/// # Examples
///
/// ```rust,ignore
/// use cfn_response::reqwest::ReqwestTransport;
/// use cfn_response::{ResponseRequest, ResponseTransport, TransportConfig};
/// use url::Url;
///
/// let transport = ReqwestTransport::new(TransportConfig::default())?;
///
/// let url = Url::parse("https://example.com/resp?sig=abc")?;
/// let receipt = transport.put(&ResponseRequest::new(url, body)).await?;
/// ```
#[derive(Clone)]
pub struct ReqwestTransport {
    inner: Arc<ReqwestTransportInner>,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Creates a new reqwest transport with the given configuration.
    pub fn new(config: TransportConfig) -> crate::Result<Self> {
        let timeout = config.timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.map(|t| t.as_millis()),
            user_agent = %user_agent,
            "Creating reqwest transport"
        );

        let mut builder = Client::builder().user_agent(&user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::from)?;

        let inner = ReqwestTransportInner { http, config };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Gets the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.inner.config
    }
}

#[async_trait::async_trait]
impl ResponseTransport for ReqwestTransport {
    async fn put(&self, request: &ResponseRequest) -> crate::Result<ResponseReceipt> {
        let started_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET,
            host = request.url.host_str(),
            path = request.url.path(),
            content_length = request.body.len(),
            "Sending status document"
        );

        let mut http_request = self.http().put(request.url.clone());
        for (name, value) in request.headers() {
            http_request = http_request.header(name, value);
        }

        let http_response = http_request
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| {
                let error = Error::from(e);
                tracing::debug!(
                    target: TRACING_TARGET,
                    failure = error.failure(),
                    "Status document was not delivered"
                );
                error
            })?;

        let status_code = http_response.status().as_u16();
        let headers: BTreeMap<String, String> = http_response
            .headers()
            .iter()
            .map(|(name, value)| {
                let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                (name.as_str().to_owned(), value)
            })
            .collect();

        let receipt = ResponseReceipt::new(status_code, started_at).with_headers(headers);
        if !request.capture_body {
            return Ok(receipt);
        }

        let body = http_response.text().await.map_err(Error::from)?;
        Ok(receipt.with_body(body))
    }
}
