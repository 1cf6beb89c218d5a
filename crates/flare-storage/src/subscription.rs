//! Subscription store scoped by resource id, plus the trigger fan-out.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use flare_core::config::DeliveryConfig;
use flare_core::errors::RepositoryError;
use flare_core::traits::{SubscriptionRepository, TriggerHandler, TriggerReport};
use flare_core::{Document, Pagination, Subscription, SubscriptionAction};

/// Subscriptions grouped by resource id, kept in creation order.
#[derive(Debug, Default)]
pub struct MemorySubscriptionRepository {
    subscriptions: DashMap<String, Vec<Subscription>>,
    delivery_defaults: Option<DeliveryConfig>,
}

impl MemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscriptions created with empty status sets get the configured ones.
    pub fn with_delivery_defaults(delivery: DeliveryConfig) -> Self {
        Self {
            subscriptions: DashMap::new(),
            delivery_defaults: Some(delivery),
        }
    }

    /// Drop every subscription bound to `resource_id`. Returns how many.
    pub fn remove_resource(&self, resource_id: &str) -> usize {
        self.subscriptions
            .remove(resource_id)
            .map(|(_, subs)| subs.len())
            .unwrap_or(0)
    }

    fn snapshot(&self, resource_id: &str) -> Vec<Subscription> {
        self.subscriptions
            .get(resource_id)
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SubscriptionRepository for MemorySubscriptionRepository {
    async fn find_all(
        &self,
        resource_id: &str,
        pagination: &Pagination,
    ) -> Result<(Vec<Subscription>, Pagination), RepositoryError> {
        Ok(pagination.apply(&self.snapshot(resource_id)))
    }

    async fn find_one(&self, resource_id: &str, id: &str) -> Result<Subscription, RepositoryError> {
        self.subscriptions
            .get(resource_id)
            .and_then(|subs| subs.iter().find(|s| s.id == id).cloned())
            .ok_or_else(|| {
                RepositoryError::not_found(format!(
                    "subscription '{id}' not found for resource '{resource_id}'"
                ))
            })
    }

    async fn create(&self, subscription: &mut Subscription) -> Result<(), RepositoryError> {
        let resource_id = subscription.resource.id.clone();
        if resource_id.is_empty() {
            return Err(RepositoryError::backend("subscription has no resource"));
        }
        if let Some(defaults) = &self.delivery_defaults {
            defaults.apply_defaults(&mut subscription.delivery);
        }
        if subscription.id.is_empty() {
            subscription.id = uuid::Uuid::new_v4().to_string();
        }
        subscription.valid()?;
        subscription.created_at = Some(Utc::now());

        let mut subs = self.subscriptions.entry(resource_id.clone()).or_default();
        if subs.iter().any(|s| s.id == subscription.id) {
            return Err(RepositoryError::already_exists(format!(
                "subscription '{}' already exists for resource '{resource_id}'",
                subscription.id
            )));
        }
        subs.push(subscription.clone());
        tracing::info!(
            subscription_id = %subscription.id,
            resource_id = %resource_id,
            "subscription created"
        );
        Ok(())
    }

    async fn delete(&self, resource_id: &str, id: &str) -> Result<(), RepositoryError> {
        let mut subs = self.subscriptions.get_mut(resource_id).ok_or_else(|| {
            RepositoryError::not_found(format!("resource '{resource_id}' has no subscriptions"))
        })?;
        let before = subs.len();
        subs.retain(|s| s.id != id);
        if subs.len() == before {
            return Err(RepositoryError::not_found(format!(
                "subscription '{id}' not found for resource '{resource_id}'"
            )));
        }
        Ok(())
    }

    async fn has_subscription(&self, resource_id: &str) -> Result<bool, RepositoryError> {
        Ok(self
            .subscriptions
            .get(resource_id)
            .map(|subs| !subs.is_empty())
            .unwrap_or(false))
    }

    async fn trigger(
        &self,
        action: SubscriptionAction,
        document: &Document,
        handler: &dyn TriggerHandler,
    ) -> Result<TriggerReport, RepositoryError> {
        let resource_id = &document.resource.id;
        let mut report = TriggerReport::default();
        if !self.has_subscription(resource_id).await? {
            tracing::debug!(resource_id = %resource_id, "no subscriptions, skipping fan-out");
            return Ok(report);
        }

        for subscription in self.snapshot(resource_id) {
            report.matched += 1;
            if let Err(e) = handler.handle(&subscription, action).await {
                tracing::warn!(
                    subscription_id = %subscription.id,
                    document_id = %document.id,
                    action = %action,
                    error = %e,
                    "notification could not be scheduled"
                );
                report.record_failure(&subscription.id, &e);
            }
        }
        Ok(report)
    }
}
