//! Document lineage store keyed by id, one entry per accepted revision.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use flare_core::errors::RepositoryError;
use flare_core::traits::DocumentRepository;
use flare_core::{Document, RevisionValue};

#[derive(Debug, Default)]
pub struct MemoryDocumentRepository {
    documents: DashMap<String, Vec<Document>>,
}

impl MemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored revisions for `id`.
    pub fn revision_count(&self, id: &str) -> usize {
        self.documents.get(id).map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl DocumentRepository for MemoryDocumentRepository {
    async fn find_one(&self, id: &str) -> Result<Document, RepositoryError> {
        let lineage = self
            .documents
            .get(id)
            .ok_or_else(|| RepositoryError::not_found(format!("document '{id}' not found")))?;
        // Highest revision wins. Revisions that cannot be compared keep the
        // current best.
        let latest = lineage.iter().fold(None::<&Document>, |best, candidate| match best {
            Some(best) if !candidate.newer(Some(best)).unwrap_or(false) => Some(best),
            _ => Some(candidate),
        });
        latest
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("document '{id}' not found")))
    }

    async fn find_one_with_revision(
        &self,
        id: &str,
        revision: &RevisionValue,
    ) -> Result<Document, RepositoryError> {
        self.documents
            .get(id)
            .and_then(|lineage| {
                lineage
                    .iter()
                    .find(|d| d.change_field_value.as_ref() == Some(revision))
                    .cloned()
            })
            .ok_or_else(|| {
                RepositoryError::not_found(format!(
                    "document '{id}' has no revision {}",
                    revision.to_json()
                ))
            })
    }

    async fn update(&self, document: &mut Document) -> Result<(), RepositoryError> {
        if document.id.is_empty() || document.change_field_value.is_none() {
            return Err(RepositoryError::backend(
                "document requires an id and a revision to be stored",
            ));
        }
        document.updated_at = Some(Utc::now());

        let mut lineage = self.documents.entry(document.id.clone()).or_default();
        match lineage
            .iter_mut()
            .find(|d| d.change_field_value == document.change_field_value)
        {
            Some(existing) => *existing = document.clone(),
            None => lineage.push(document.clone()),
        }
        tracing::debug!(document_id = %document.id, revisions = lineage.len(), "document stored");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::unsupported(format!(
            "document deletion is disabled (document '{id}')"
        )))
    }
}
