//! Tests for the in-memory subscription store and trigger fan-out.

use std::sync::Mutex;

use async_trait::async_trait;
use flare_core::config::DeliveryConfig;
use flare_core::errors::PipelineError;
use flare_core::traits::{SubscriptionRepository, TriggerHandler};
use flare_core::{
    Document, FlareError, Pagination, Resource, ResourceChange, RevisionKind, RevisionValue,
    Subscription, SubscriptionAction, SubscriptionDelivery, SubscriptionEndpoint,
};
use flare_storage::MemorySubscriptionRepository;

fn users() -> Resource {
    Resource {
        id: "users".to_string(),
        addresses: vec!["http://app.com".to_string()],
        path: "/users/{id}".to_string(),
        change: ResourceChange::new("revision", RevisionKind::Integer),
        created_at: None,
    }
}

fn subscription(id: &str) -> Subscription {
    Subscription {
        id: id.to_string(),
        endpoint: SubscriptionEndpoint::new(format!("http://hooks.example.com/{id}")),
        delivery: SubscriptionDelivery::new([200], [410]),
        resource: users(),
        ..Default::default()
    }
}

/// Records every invocation and fails for the listed subscription ids.
#[derive(Default)]
struct RecordingHandler {
    fail_for: Vec<String>,
    calls: Mutex<Vec<(String, SubscriptionAction)>>,
}

#[async_trait]
impl TriggerHandler for RecordingHandler {
    async fn handle(
        &self,
        subscription: &Subscription,
        action: SubscriptionAction,
    ) -> Result<(), FlareError> {
        self.calls
            .lock()
            .unwrap()
            .push((subscription.id.clone(), action));
        if self.fail_for.contains(&subscription.id) {
            return Err(PipelineError::Closed.into());
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_create_find_delete() {
    let repo = MemorySubscriptionRepository::new();
    let mut sub = subscription("");
    repo.create(&mut sub).await.unwrap();
    assert!(!sub.id.is_empty());
    assert!(sub.created_at.is_some());

    assert_eq!(repo.find_one("users", &sub.id).await.unwrap(), sub);
    repo.delete("users", &sub.id).await.unwrap();
    assert!(repo.find_one("users", &sub.id).await.unwrap_err().is_not_found());
    assert!(repo.delete("users", &sub.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_duplicate_id_already_exists() {
    let repo = MemorySubscriptionRepository::new();
    repo.create(&mut subscription("s1")).await.unwrap();
    let err = repo.create(&mut subscription("s1")).await.unwrap_err();
    assert!(err.is_already_exists());
}

#[tokio::test]
async fn test_empty_delivery_gets_configured_defaults() {
    let repo = MemorySubscriptionRepository::with_delivery_defaults(DeliveryConfig::default());
    let mut sub = subscription("s1");
    sub.delivery = SubscriptionDelivery::default();
    repo.create(&mut sub).await.unwrap();
    assert_eq!(sub.delivery.success, vec![200, 201, 202, 204]);
    assert!(sub.valid().is_ok());
}

#[tokio::test]
async fn test_find_all_is_scoped_and_paginated() {
    let repo = MemorySubscriptionRepository::new();
    for id in ["s1", "s2", "s3"] {
        repo.create(&mut subscription(id)).await.unwrap();
    }
    let (page, pagination) = repo
        .find_all("users", &Pagination::new(2, 0))
        .await
        .unwrap();
    let ids: Vec<&str> = page.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2"]);
    assert_eq!(pagination.total, 3);

    let (page, pagination) = repo.find_all("orders", &Pagination::default()).await.unwrap();
    assert!(page.is_empty());
    assert_eq!(pagination.total, 0);
}

#[tokio::test]
async fn test_trigger_without_subscriptions_skips_handler() {
    let repo = MemorySubscriptionRepository::new();
    let handler = RecordingHandler::default();
    let document = Document::new("1", RevisionValue::Integer(1.0), users());
    let report = repo
        .trigger(SubscriptionAction::Update, &document, &handler)
        .await
        .unwrap();
    assert_eq!(report.matched, 0);
    assert!(handler.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_trigger_continues_past_failures() {
    let repo = MemorySubscriptionRepository::new();
    for id in ["s1", "s2", "s3"] {
        repo.create(&mut subscription(id)).await.unwrap();
    }
    let handler = RecordingHandler {
        fail_for: vec!["s2".to_string()],
        ..Default::default()
    };
    let document = Document::new("1", RevisionValue::Integer(1.0), users());

    let report = repo
        .trigger(SubscriptionAction::Create, &document, &handler)
        .await
        .unwrap();
    assert_eq!(report.matched, 3);
    assert_eq!(report.scheduled(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].subscription_id, "s2");

    let calls = handler.calls.lock().unwrap();
    let ids: Vec<&str> = calls.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2", "s3"]);
    assert!(calls.iter().all(|(_, a)| *a == SubscriptionAction::Create));

    let err = report.clone().into_result("1").unwrap_err();
    assert_eq!(err.failures().len(), 1);
}

#[tokio::test]
async fn test_create_rejects_invalid_subscriptions() {
    let repo = MemorySubscriptionRepository::new();
    let mut sub = subscription("s1");
    sub.endpoint.url = "http://exa mple.com/hook".to_string();
    assert!(repo.create(&mut sub).await.unwrap_err().is_invalid());

    let mut sub = subscription("s2");
    sub.delivery = SubscriptionDelivery::new([200], [200]);
    assert!(repo.create(&mut sub).await.unwrap_err().is_invalid());

    assert!(!repo.has_subscription("users").await.unwrap());
}
