//! Tests for HTTP delivery and status classification.

mod common;

use std::collections::BTreeMap;

use flare_core::config::DeliveryConfig;
use flare_core::errors::{DeliveryError, PipelineError};
use flare_core::{SubscriptionAction, SubscriptionDelivery};
use flare_delivery::{DeliveryTask, HttpProcessor};
use flare_worker::Processor;
use serde_json::json;

use common::spawn_endpoint;

fn task(url: String) -> DeliveryTask {
    let mut headers = BTreeMap::new();
    headers.insert("X-Flare-Test".to_string(), vec!["yes".to_string()]);
    DeliveryTask {
        subscription_id: "sub-1".to_string(),
        resource_id: "users".to_string(),
        action: SubscriptionAction::Update,
        document_id: "http://app.com/users/1".to_string(),
        revision: Some("2".to_string()),
        url,
        method: "POST".to_string(),
        headers,
        body: json!({"action": "update", "data": {"user": "1"}}),
        delivery: SubscriptionDelivery::new([200, 204], [410]),
    }
}

fn processor() -> HttpProcessor {
    HttpProcessor::new(&DeliveryConfig::default()).unwrap()
}

#[tokio::test]
async fn test_success_status_is_delivered() {
    let endpoint = spawn_endpoint(204).await;
    let status = processor()
        .deliver(&task(format!("{}/hooks", endpoint.base_url)))
        .await
        .unwrap();
    assert_eq!(status, 204);

    let captured = endpoint.captured();
    assert_eq!(captured.len(), 1);
    let request = &captured[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/hooks");
    assert_eq!(request.header("x-flare-test"), Some("yes"));
    assert!(request
        .header("user-agent")
        .is_some_and(|ua| ua.starts_with("flare/")));
    assert_eq!(request.body["data"]["user"], "1");
}

#[tokio::test]
async fn test_discard_status_is_terminal() {
    let endpoint = spawn_endpoint(410).await;
    let err = processor()
        .deliver(&task(endpoint.base_url.clone()))
        .await
        .unwrap_err();
    assert_eq!(err, DeliveryError::Discarded { status: 410 });
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_unlisted_status_is_transient() {
    let endpoint = spawn_endpoint(503).await;
    let err = processor()
        .deliver(&task(endpoint.base_url.clone()))
        .await
        .unwrap_err();
    assert_eq!(err, DeliveryError::Transient { status: 503 });
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_process_maps_outcomes_to_pipeline_errors() {
    let endpoint = spawn_endpoint(503).await;
    let payload = task(endpoint.base_url.clone()).encode().unwrap();
    let err = processor().process(&payload).await.unwrap_err();
    assert!(matches!(err, PipelineError::Process { retryable: true, .. }));

    let endpoint = spawn_endpoint(410).await;
    let payload = task(endpoint.base_url.clone()).encode().unwrap();
    let err = processor().process(&payload).await.unwrap_err();
    assert!(matches!(err, PipelineError::Process { retryable: false, .. }));

    let endpoint = spawn_endpoint(200).await;
    let payload = task(endpoint.base_url.clone()).encode().unwrap();
    assert!(processor().process(&payload).await.is_ok());
}

#[tokio::test]
async fn test_undecodable_payload_is_rejected() {
    let err = processor().process(b"not a task").await.unwrap_err();
    assert!(matches!(err, PipelineError::Decode { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = processor()
        .deliver(&task(format!("http://{addr}/hooks")))
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Transport { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_invalid_method_is_rejected() {
    let mut t = task("http://127.0.0.1:9/hooks".to_string());
    t.method = "BAD METHOD".to_string();
    let err = processor().deliver(&t).await.unwrap_err();
    assert!(matches!(err, DeliveryError::InvalidRequest { .. }));
}

#[test]
fn test_task_envelope_uses_camel_case() {
    let json: serde_json::Value =
        serde_json::from_slice(&task("http://h".to_string()).encode().unwrap()).unwrap();
    assert_eq!(json["subscriptionId"], "sub-1");
    assert_eq!(json["action"], "update");
    assert_eq!(json["delivery"]["discard"], json!([410]));
}
