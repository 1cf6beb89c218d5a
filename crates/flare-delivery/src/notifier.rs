//! [`SubscriptionTrigger`] implementation that schedules one delivery task
//! per subscription through the worker.

use std::sync::Arc;

use async_trait::async_trait;
use flare_core::models::WildcardReplacer;
use flare_core::traits::{SubscriptionRepository, SubscriptionTrigger, TriggerHandler};
use flare_core::{Document, FlareError, Subscription, SubscriptionAction};
use flare_worker::Worker;

use crate::task::DeliveryTask;

pub struct Notifier {
    subscriptions: Arc<dyn SubscriptionRepository>,
    worker: Arc<Worker>,
}

impl Notifier {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>, worker: Arc<Worker>) -> Self {
        Self {
            subscriptions,
            worker,
        }
    }

    /// Fan out `action` for `document`. Returns how many tasks were pushed.
    ///
    /// The id and revision are resolved before anything is pushed, so an
    /// addressing failure schedules nothing. A failed push does not stop the
    /// remaining subscriptions; the failures come back as a trigger error.
    pub async fn notify(
        &self,
        action: SubscriptionAction,
        document: &Document,
    ) -> Result<usize, FlareError> {
        let replacer = document
            .resource
            .wildcard_replace(&document.id, document.change_field_value.as_ref())?;
        let scheduler = TaskScheduler {
            worker: &self.worker,
            document,
            replacer,
        };
        let report = self
            .subscriptions
            .trigger(action, document, &scheduler)
            .await?;
        tracing::debug!(
            document_id = %document.id,
            action = %action,
            matched = report.matched,
            failed = report.failures.len(),
            "fan-out finished"
        );
        Ok(report.into_result(&document.id)?)
    }
}

#[async_trait]
impl SubscriptionTrigger for Notifier {
    async fn create(&self, document: &Document) -> Result<(), FlareError> {
        self.notify(SubscriptionAction::Create, document).await.map(|_| ())
    }

    async fn update(&self, document: &Document) -> Result<(), FlareError> {
        self.notify(SubscriptionAction::Update, document).await.map(|_| ())
    }

    async fn delete(&self, document: &Document) -> Result<(), FlareError> {
        self.notify(SubscriptionAction::Delete, document).await.map(|_| ())
    }
}

/// Per-fan-out handler: builds, encodes, and pushes one task.
struct TaskScheduler<'a> {
    worker: &'a Worker,
    document: &'a Document,
    replacer: WildcardReplacer,
}

#[async_trait]
impl TriggerHandler for TaskScheduler<'_> {
    async fn handle(
        &self,
        subscription: &Subscription,
        action: SubscriptionAction,
    ) -> Result<(), FlareError> {
        let task = DeliveryTask::build(subscription, action, self.document, &self.replacer);
        let payload = task.encode()?;
        self.worker.push(payload).await?;
        tracing::debug!(
            subscription_id = %subscription.id,
            document_id = %self.document.id,
            action = %action,
            "notification scheduled"
        );
        Ok(())
    }
}
