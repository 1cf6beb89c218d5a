//! Tests for the in-memory resource store.

use std::sync::Arc;

use flare_core::traits::{ResourceRepository, SubscriptionRepository};
use flare_core::{
    Pagination, Resource, ResourceChange, RevisionKind, Subscription, SubscriptionDelivery,
    SubscriptionEndpoint,
};
use flare_storage::{MemoryResourceRepository, MemorySubscriptionRepository};

fn resource(id: &str, path: &str) -> Resource {
    Resource {
        id: id.to_string(),
        addresses: vec!["http://app.com".to_string()],
        path: path.to_string(),
        change: ResourceChange::new("revision", RevisionKind::Integer),
        created_at: None,
    }
}

#[tokio::test]
async fn test_create_assigns_id_and_timestamp() {
    let repo = MemoryResourceRepository::new();
    let mut r = resource("", "/users/{id}");
    repo.create(&mut r).await.unwrap();
    assert!(!r.id.is_empty());
    assert!(r.created_at.is_some());
    assert_eq!(repo.find_one(&r.id).await.unwrap(), r);
}

#[tokio::test]
async fn test_create_duplicate_id_already_exists() {
    let repo = MemoryResourceRepository::new();
    repo.create(&mut resource("users", "/users/{id}")).await.unwrap();
    let err = repo
        .create(&mut resource("users", "/people/{id}"))
        .await
        .unwrap_err();
    assert!(err.is_already_exists());
}

#[tokio::test]
async fn test_create_equivalent_path_conflicts() {
    let repo = MemoryResourceRepository::new();
    repo.create(&mut resource("users", "/users/{id}")).await.unwrap();
    let err = repo
        .create(&mut resource("people", "/users/{userId}"))
        .await
        .unwrap_err();
    assert!(err.is_path_conflict());

    // Same path on another host is fine.
    let mut other = resource("other", "/users/{id}");
    other.addresses = vec!["http://other.com".to_string()];
    assert!(repo.create(&mut other).await.is_ok());
}

#[tokio::test]
async fn test_find_by_uri_resolves_owner() {
    let repo = MemoryResourceRepository::new();
    repo.create(&mut resource("users", "/users/{id}")).await.unwrap();
    repo.create(&mut resource("orders", "/orders/{id}")).await.unwrap();

    let found = repo.find_by_uri("http://app.com/orders/17").await.unwrap();
    assert_eq!(found.id, "orders");

    let err = repo.find_by_uri("http://app.com/carts/17").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_find_all_paginates() {
    let repo = MemoryResourceRepository::new();
    for (id, path) in [("a", "/a/{id}"), ("b", "/b/{id}"), ("c", "/c/{id}")] {
        repo.create(&mut resource(id, path)).await.unwrap();
    }
    let (page, pagination) = repo.find_all(&Pagination::new(2, 1)).await.unwrap();
    let ids: Vec<&str> = page.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c"]);
    assert_eq!(pagination.total, 3);
}

#[tokio::test]
async fn test_delete_unknown_is_not_found() {
    let repo = MemoryResourceRepository::new();
    assert!(repo.delete("ghost").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_removes_subscriptions() {
    let subscriptions = Arc::new(MemorySubscriptionRepository::new());
    let repo = MemoryResourceRepository::with_subscriptions(Arc::clone(&subscriptions));
    let mut users = resource("users", "/users/{id}");
    repo.create(&mut users).await.unwrap();

    let mut sub = Subscription {
        endpoint: SubscriptionEndpoint::new("http://hooks.example.com"),
        delivery: SubscriptionDelivery::new([200], Vec::<u16>::new()),
        resource: users.clone(),
        ..Default::default()
    };
    subscriptions.create(&mut sub).await.unwrap();
    assert!(subscriptions.has_subscription("users").await.unwrap());

    repo.delete("users").await.unwrap();
    assert!(!subscriptions.has_subscription("users").await.unwrap());
    assert!(repo.find_one("users").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_create_rejects_invalid_resources() {
    let repo = MemoryResourceRepository::new();
    let err = repo.create(&mut resource("users", "")).await.unwrap_err();
    assert!(err.is_invalid());

    let mut bad_address = resource("users", "/users/{id}");
    bad_address.addresses = vec!["http://app com".to_string()];
    assert!(repo.create(&mut bad_address).await.unwrap_err().is_invalid());

    let (page, _) = repo.find_all(&Pagination::default()).await.unwrap();
    assert!(page.is_empty());
}
