//! Document update flow: resolve, validate, compare, persist, trigger.

use std::sync::Arc;

use dashmap::DashMap;
use flare_core::errors::ValidationError;
use flare_core::traits::{DocumentRepository, ResourceRepository, SubscriptionTrigger};
use flare_core::{Document, FlareError, RevisionValue};
use tokio::sync::Mutex;

/// Result of [`DocumentService::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// First accepted state for the id; `create` notifications scheduled.
    Created(Document),
    /// Newer than the stored state; `update` notifications scheduled.
    Updated(Document),
    /// Not newer than `current`; nothing persisted or triggered.
    Ignored { current: Document },
}

impl UpdateOutcome {
    pub fn accepted(&self) -> bool {
        !matches!(self, Self::Ignored { .. })
    }
}

pub struct DocumentService {
    resources: Arc<dyn ResourceRepository>,
    documents: Arc<dyn DocumentRepository>,
    trigger: Arc<dyn SubscriptionTrigger>,
    // One lock per document id, held from the reference read to the trigger.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl DocumentService {
    pub fn new(
        resources: Arc<dyn ResourceRepository>,
        documents: Arc<dyn DocumentRepository>,
        trigger: Arc<dyn SubscriptionTrigger>,
    ) -> Self {
        Self {
            resources,
            documents,
            trigger,
            locks: DashMap::new(),
        }
    }

    /// Latest accepted state of the document at `uri`.
    pub async fn find(&self, uri: &str) -> Result<Document, FlareError> {
        Ok(self.documents.find_one(uri).await?)
    }

    /// Propose `content` as the new state of the document at `uri`.
    ///
    /// The revision is read from `content[change.field]` of the owning
    /// resource. Only a strictly newer revision is persisted and triggers
    /// notifications. Updates of one uri are serialized, so concurrent
    /// writers never accept the same revision twice and notifications for
    /// one document are scheduled in revision order. A trigger failure is
    /// returned after the document was persisted.
    pub async fn update(
        &self,
        uri: &str,
        content: &serde_json::Value,
    ) -> Result<UpdateOutcome, FlareError> {
        let lock = Arc::clone(self.locks.entry(uri.to_string()).or_default().value());
        let outcome = {
            let _guard = lock.lock().await;
            self.update_serialized(uri, content).await
        };
        drop(lock);
        self.locks.remove_if(uri, |_, lock| Arc::strong_count(lock) == 1);
        outcome
    }

    async fn update_serialized(
        &self,
        uri: &str,
        content: &serde_json::Value,
    ) -> Result<UpdateOutcome, FlareError> {
        let resource = self.resources.find_by_uri(uri).await?;
        let kind = resource.change.kind.ok_or(ValidationError::MissingKind)?;
        let revision = content
            .get(&resource.change.field)
            .ok_or(ValidationError::MissingRevision)
            .and_then(|value| RevisionValue::from_json(kind, value))?;

        let mut document = Document::new(uri, revision, resource);
        document.valid()?;

        let reference = match self.documents.find_one(uri).await {
            Ok(reference) => Some(reference),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };
        if !document.newer(reference.as_ref())? {
            tracing::debug!(document_id = %uri, "revision not newer, update ignored");
            return Ok(UpdateOutcome::Ignored {
                // `newer` only returns false against an existing reference.
                current: reference.unwrap_or_else(|| document.clone()),
            });
        }

        self.documents.update(&mut document).await?;
        tracing::info!(document_id = %uri, first_seen = reference.is_none(), "document accepted");

        if reference.is_none() {
            self.trigger.create(&document).await?;
            Ok(UpdateOutcome::Created(document))
        } else {
            self.trigger.update(&document).await?;
            Ok(UpdateOutcome::Updated(document))
        }
    }

    /// Number of uris with an update in flight.
    pub fn pending_updates(&self) -> usize {
        self.locks.len()
    }

    /// Document deletion is declared but disabled in the store.
    pub async fn delete(&self, uri: &str) -> Result<(), FlareError> {
        let document = self.documents.find_one(uri).await?;
        self.documents.delete(uri).await?;
        self.trigger.delete(&document).await
    }
}
