//! Resource store with id and path-template conflict detection.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use flare_core::errors::RepositoryError;
use flare_core::traits::ResourceRepository;
use flare_core::{Pagination, Resource};

use crate::subscription::MemorySubscriptionRepository;

#[derive(Debug, Default)]
pub struct MemoryResourceRepository {
    resources: DashMap<String, Resource>,
    // Serializes the conflict check with the insert.
    create_lock: Mutex<()>,
    subscriptions: Option<Arc<MemorySubscriptionRepository>>,
}

impl MemoryResourceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deleting a resource also drops its subscriptions from `subscriptions`.
    pub fn with_subscriptions(subscriptions: Arc<MemorySubscriptionRepository>) -> Self {
        Self {
            subscriptions: Some(subscriptions),
            ..Self::default()
        }
    }

    fn sorted(&self) -> Vec<Resource> {
        let mut all: Vec<Resource> = self.resources.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        all
    }

    fn insert_checked(&self, resource: &Resource) -> Result<(), RepositoryError> {
        let _guard = self
            .create_lock
            .lock()
            .map_err(|_| RepositoryError::backend("resource store lock poisoned"))?;
        if self.resources.contains_key(&resource.id) {
            return Err(RepositoryError::already_exists(format!(
                "resource '{}' already exists",
                resource.id
            )));
        }
        if let Some(existing) = self
            .resources
            .iter()
            .find(|r| r.value().path_conflicts(resource))
        {
            return Err(RepositoryError::path_conflict(format!(
                "resource '{}' path '{}' conflicts with resource '{}'",
                resource.id,
                resource.path,
                existing.key()
            )));
        }
        self.resources.insert(resource.id.clone(), resource.clone());
        Ok(())
    }
}

#[async_trait]
impl ResourceRepository for MemoryResourceRepository {
    async fn find_all(
        &self,
        pagination: &Pagination,
    ) -> Result<(Vec<Resource>, Pagination), RepositoryError> {
        Ok(pagination.apply(&self.sorted()))
    }

    async fn find_one(&self, id: &str) -> Result<Resource, RepositoryError> {
        self.resources
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| RepositoryError::not_found(format!("resource '{id}' not found")))
    }

    async fn find_by_uri(&self, uri: &str) -> Result<Resource, RepositoryError> {
        self.sorted()
            .into_iter()
            .find(|r| r.matches(uri).is_some())
            .ok_or_else(|| RepositoryError::not_found(format!("no resource matches '{uri}'")))
    }

    async fn create(&self, resource: &mut Resource) -> Result<(), RepositoryError> {
        resource.valid()?;
        if resource.id.is_empty() {
            resource.id = uuid::Uuid::new_v4().to_string();
        }
        resource.created_at = Some(Utc::now());
        self.insert_checked(resource)?;
        tracing::info!(resource_id = %resource.id, path = %resource.path, "resource created");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.resources
            .remove(id)
            .ok_or_else(|| RepositoryError::not_found(format!("resource '{id}' not found")))?;
        if let Some(subscriptions) = &self.subscriptions {
            let removed = subscriptions.remove_resource(id);
            tracing::info!(resource_id = %id, subscriptions = removed, "resource deleted");
        }
        Ok(())
    }
}
