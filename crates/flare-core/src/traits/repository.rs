//! Storage contracts. One adapter per backend implements each trait.

use async_trait::async_trait;

use crate::errors::RepositoryError;
use crate::models::{Document, Pagination, Resource, RevisionValue, Subscription, SubscriptionAction};

use super::trigger::{TriggerHandler, TriggerReport};

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Latest stored state for `id`.
    async fn find_one(&self, id: &str) -> Result<Document, RepositoryError>;

    /// Stored state for `id` at exactly `revision`.
    async fn find_one_with_revision(
        &self,
        id: &str,
        revision: &RevisionValue,
    ) -> Result<Document, RepositoryError>;

    /// Upsert by `(id, revision)` and stamp `updated_at`.
    async fn update(&self, document: &mut Document) -> Result<(), RepositoryError>;

    /// Remove the document lineage.
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn find_all(
        &self,
        pagination: &Pagination,
    ) -> Result<(Vec<Resource>, Pagination), RepositoryError>;

    async fn find_one(&self, id: &str) -> Result<Resource, RepositoryError>;

    /// Resolve a concrete document address back to its owning resource.
    async fn find_by_uri(&self, uri: &str) -> Result<Resource, RepositoryError>;

    async fn create(&self, resource: &mut Resource) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find_all(
        &self,
        resource_id: &str,
        pagination: &Pagination,
    ) -> Result<(Vec<Subscription>, Pagination), RepositoryError>;

    async fn find_one(&self, resource_id: &str, id: &str) -> Result<Subscription, RepositoryError>;

    async fn create(&self, subscription: &mut Subscription) -> Result<(), RepositoryError>;

    async fn delete(&self, resource_id: &str, id: &str) -> Result<(), RepositoryError>;

    /// Cheap existence check used to skip the fan-out.
    async fn has_subscription(&self, resource_id: &str) -> Result<bool, RepositoryError>;

    /// Invoke `handler` once per subscription bound to `document.resource`.
    ///
    /// A failing handler does not stop the remaining invocations; failures
    /// are collected in the report.
    async fn trigger(
        &self,
        action: SubscriptionAction,
        document: &Document,
        handler: &dyn TriggerHandler,
    ) -> Result<TriggerReport, RepositoryError>;
}
