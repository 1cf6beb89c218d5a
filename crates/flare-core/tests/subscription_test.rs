//! Tests for subscription validation and delivery classification.

use flare_core::models::DeliveryOutcome;
use flare_core::{Resource, Subscription, SubscriptionAction, SubscriptionDelivery, SubscriptionEndpoint};

fn subscription() -> Subscription {
    Subscription {
        id: "sub-1".to_string(),
        endpoint: SubscriptionEndpoint::new("http://hooks.example.com/users"),
        delivery: SubscriptionDelivery::new([200, 204], [410]),
        resource: Resource {
            id: "users".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_classify_follows_success_and_discard_sets() {
    let delivery = SubscriptionDelivery::new([200, 204], [410]);
    assert_eq!(delivery.classify(204), DeliveryOutcome::Success);
    assert_eq!(delivery.classify(200), DeliveryOutcome::Success);
    assert_eq!(delivery.classify(410), DeliveryOutcome::Discard);
    assert_eq!(delivery.classify(503), DeliveryOutcome::Retry);
    assert_eq!(delivery.classify(201), DeliveryOutcome::Retry);
}

#[test]
fn test_valid_subscription_passes() {
    assert!(subscription().valid().is_ok());
}

#[test]
fn test_valid_rejects_overlapping_sets() {
    let mut sub = subscription();
    sub.delivery = SubscriptionDelivery::new([200, 410], [410]);
    assert!(sub.valid().is_err());
}

#[test]
fn test_valid_rejects_empty_success_and_bad_codes() {
    let mut sub = subscription();
    sub.delivery = SubscriptionDelivery::new(Vec::<u16>::new(), [410]);
    assert!(sub.valid().is_err());

    sub.delivery = SubscriptionDelivery::new([200], [1000]);
    assert!(sub.valid().is_err());
}

#[test]
fn test_valid_rejects_bad_endpoints() {
    let mut sub = subscription();
    sub.endpoint.url = "hooks.example.com".to_string();
    assert!(sub.valid().is_err());

    sub.endpoint.url = "https://".to_string();
    assert!(sub.valid().is_err());

    sub.endpoint.url = "http://exa mple.com/hook".to_string();
    assert!(sub.valid().is_err());

    sub.endpoint.url = "ftp://hooks.example.com/users".to_string();
    assert!(sub.valid().is_err());

    sub.endpoint.url = "http://hooks.example.com/{id}?rev={revision}".to_string();
    assert!(sub.valid().is_ok());

    let mut sub = subscription();
    sub.endpoint.method = "TRACE".to_string();
    assert!(sub.valid().is_err());

    sub.endpoint.method = "put".to_string();
    assert!(sub.valid().is_ok());
}

#[test]
fn test_valid_requires_resource() {
    let mut sub = subscription();
    sub.resource.id.clear();
    assert!(sub.valid().is_err());
}

#[test]
fn test_endpoint_defaults_to_post() {
    let sub: Subscription = serde_json::from_value(serde_json::json!({
        "endpoint": {"url": "http://hooks.example.com"},
        "delivery": {"success": [200]}
    }))
    .unwrap();
    assert_eq!(sub.endpoint.method, "POST");
    assert!(sub.endpoint.headers.is_empty());
}

#[test]
fn test_actions_render_lowercase() {
    assert_eq!(SubscriptionAction::Create.to_string(), "create");
    assert_eq!(
        serde_json::to_value(SubscriptionAction::Delete).unwrap(),
        serde_json::json!("delete")
    );
}
