//! End-to-end delivery through the reqwest transport against a local destination.

#![cfg(feature = "reqwest")]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::put;
use cfn_response::reqwest::ReqwestTransport;
use cfn_response::{
    Error, ErrorKind, LogLevel, ReporterConfig, RequestContext, ResponseData, ResponseReporter,
    ResponseRequest, ResponseTransport, StatusDetails, TransportConfig,
};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
struct Delivery {
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

type Deliveries = Arc<Mutex<Vec<Delivery>>>;

async fn accept(
    State(deliveries): State<Deliveries>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    deliveries.lock().unwrap().push(Delivery { uri, headers, body });
    (StatusCode::OK, "accepted")
}

/// Starts a destination on an ephemeral port and returns its response URL.
async fn spawn_destination() -> (String, Deliveries) {
    let deliveries = Deliveries::default();
    let app = Router::new()
        .route("/resp/testing", put(accept))
        .with_state(deliveries.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/resp/testing?testId=436"), deliveries)
}

fn context(response_url: &str) -> RequestContext {
    RequestContext::new("f3a936", "c4dd7439", "testResource", response_url)
}

fn reporter(log_level: LogLevel) -> ResponseReporter {
    let config = ReporterConfig::default()
        .with_log_level(log_level)
        .with_transport(TransportConfig::default().with_timeout(10));
    ResponseReporter::with_reqwest(config).unwrap()
}

fn sink(error: Option<Error>, data: Option<ResponseData>) -> (Option<Error>, Option<ResponseData>) {
    (error, data)
}

#[tokio::test]
async fn delivers_success_document() {
    let (url, deliveries) = spawn_destination().await;
    let reporter = reporter(LogLevel::Normal);

    let resolution = reporter
        .report_success("12345a", Some(json!("hello")), Some(&context(&url)))
        .await
        .unwrap();
    assert_eq!(
        Value::Object(resolution.data().cloned().unwrap()),
        json!({"data": "hello"})
    );

    let deliveries = deliveries.lock().unwrap();
    assert_eq!(deliveries.len(), 1);
    let delivery = &deliveries[0];

    assert_eq!(delivery.uri.path(), "/resp/testing");
    assert_eq!(delivery.uri.query(), Some("testId=436"));
    assert_eq!(delivery.headers["content-type"], "");
    assert_eq!(
        delivery.headers["content-length"],
        delivery.body.len().to_string().as_str()
    );

    let document: Value = serde_json::from_slice(&delivery.body).unwrap();
    assert_eq!(
        document,
        json!({
            "Status": "SUCCESS",
            "PhysicalResourceId": "12345a",
            "StackId": "f3a936",
            "RequestId": "c4dd7439",
            "LogicalResourceId": "testResource",
            "Data": {"data": "hello"}
        })
    );
}

#[tokio::test]
async fn failed_report_resolves_with_reason() {
    let (url, deliveries) = spawn_destination().await;
    let reporter = reporter(LogLevel::Verbose);
    let details = || Some(StatusDetails::failed("boom").with_physical_resource_id("12345a"));

    let resolution = reporter.report(details(), Some(&context(&url))).await.unwrap();
    let failure = resolution.failure().unwrap();
    assert_eq!(failure.kind(), ErrorKind::ApplicationFailure);
    assert_eq!(failure.message(), Some("boom"));

    let (error, data) = reporter
        .report_with_sink(details(), Some(&context(&url)), sink)
        .await;
    assert_eq!(error.unwrap().message(), Some("boom"));
    assert!(data.is_none());

    let deliveries = deliveries.lock().unwrap();
    assert_eq!(deliveries.len(), 2);
    let document: Value = serde_json::from_slice(&deliveries[0].body).unwrap();
    assert_eq!(document["Status"], "FAILED");
    assert_eq!(document["Reason"], "boom");
}

#[tokio::test]
async fn captures_body_when_requested() {
    let (url, _deliveries) = spawn_destination().await;
    let transport = ReqwestTransport::new(TransportConfig::default()).unwrap();
    let url = url::Url::parse(&url).unwrap();

    let receipt = transport
        .put(&ResponseRequest::new(url.clone(), b"{}".to_vec()).with_capture_body(true))
        .await
        .unwrap();
    assert!(receipt.is_success());
    assert_eq!(receipt.body.as_deref(), Some("accepted"));

    let receipt = transport
        .put(&ResponseRequest::new(url, b"{}".to_vec()))
        .await
        .unwrap();
    assert_eq!(receipt.status_code, 200);
    assert!(receipt.body.is_none());
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{addr}/resp/testing?testId=436");
    let reporter = reporter(LogLevel::Debug);

    let error = reporter
        .report_success("12345a", None, Some(&context(&url)))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Transport);
    assert!(
        error
            .message()
            .unwrap()
            .starts_with("CRITICAL: Error sending response due to: [")
    );

    let (error, _) = reporter
        .report_failure_with_sink(Some("boom".into()), Some(&context(&url)), None, None, sink)
        .await;
    assert_eq!(error.unwrap().kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn malformed_destination_is_rejected_before_sending() {
    let reporter = reporter(LogLevel::Normal);

    let error = reporter
        .report(Some(StatusDetails::success()), Some(&context("notAURL")))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MalformedDestination);
}
