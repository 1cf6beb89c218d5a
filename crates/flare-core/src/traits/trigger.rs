//! The boundary between "document accepted" and "notifications scheduled".

use async_trait::async_trait;

use crate::errors::{FlareError, TriggerError, TriggerFailure};
use crate::models::{Document, Subscription, SubscriptionAction};

/// Schedules delivery tasks for accepted document changes. Implementations
/// enqueue work and never perform the HTTP call themselves.
#[async_trait]
pub trait SubscriptionTrigger: Send + Sync {
    /// First accepted state of a document.
    async fn create(&self, document: &Document) -> Result<(), FlareError>;

    async fn update(&self, document: &Document) -> Result<(), FlareError>;

    async fn delete(&self, document: &Document) -> Result<(), FlareError>;
}

/// Per-subscription callback used by [`SubscriptionRepository::trigger`].
///
/// [`SubscriptionRepository::trigger`]: super::SubscriptionRepository::trigger
#[async_trait]
pub trait TriggerHandler: Send + Sync {
    async fn handle(
        &self,
        subscription: &Subscription,
        action: SubscriptionAction,
    ) -> Result<(), FlareError>;
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerReport {
    /// Subscriptions the handler was invoked for.
    pub matched: usize,
    pub failures: Vec<TriggerFailure>,
}

impl TriggerReport {
    pub fn record_failure(&mut self, subscription_id: &str, error: &FlareError) {
        self.failures.push(TriggerFailure {
            subscription_id: subscription_id.to_string(),
            reason: error.to_string(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn scheduled(&self) -> usize {
        self.matched - self.failures.len()
    }

    /// Convert into an error when any invocation failed.
    pub fn into_result(self, document_id: &str) -> Result<usize, TriggerError> {
        if self.is_clean() {
            return Ok(self.matched);
        }
        Err(TriggerError::Partial {
            document_id: document_id.to_string(),
            total: self.matched,
            failed: self.failures.len(),
            failures: self.failures,
        })
    }
}
