//! Documents and the revision comparison engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::Resource;
use super::revision::{parse_date, RevisionKind, RevisionValue};
use crate::errors::{ComparisonError, ValidationError};

/// One observed state of an addressable entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub change_field_value: Option<RevisionValue>,
    pub resource: Resource,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    pub fn new(id: impl Into<String>, revision: RevisionValue, resource: Resource) -> Self {
        Self {
            id: id.into(),
            change_field_value: Some(revision),
            resource,
            updated_at: None,
        }
    }

    /// Check the document can be compared and persisted.
    pub fn valid(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingId);
        }
        let revision = self
            .change_field_value
            .as_ref()
            .ok_or(ValidationError::MissingRevision)?;
        let change = &self.resource.change;
        change.valid()?;

        let expected = change.kind.ok_or(ValidationError::MissingKind)?;
        if revision.kind() != expected {
            return Err(ValidationError::RevisionKindMismatch {
                expected: expected.as_str(),
                actual: revision.kind().as_str(),
            });
        }
        if let RevisionValue::Date(raw) = revision {
            if parse_date(raw, &change.date_format).is_none() {
                return Err(ValidationError::InvalidDate {
                    value: raw.clone(),
                    format: change.date_format.clone(),
                });
            }
        }
        Ok(())
    }

    /// Whether this document is strictly newer than `reference`.
    ///
    /// A missing reference means the id was never seen, so the document is
    /// newer. Equal revisions are not newer. The kind and date format come
    /// from this document's resource.
    pub fn newer(&self, reference: Option<&Document>) -> Result<bool, ComparisonError> {
        let Some(reference) = reference else {
            return Ok(true);
        };
        let change = &self.resource.change;
        let kind = change.kind.ok_or_else(|| ComparisonError::UnsupportedKind {
            kind: String::new(),
        })?;
        let (candidate, reference) = match (&self.change_field_value, &reference.change_field_value)
        {
            (Some(candidate), Some(reference)) => (candidate, reference),
            _ => {
                return Err(ComparisonError::TypeMismatch {
                    expected: kind.as_str(),
                    found: "nothing",
                })
            }
        };

        match kind {
            RevisionKind::Integer => candidate.newer_integer(reference),
            RevisionKind::String => candidate.newer_string(reference),
            RevisionKind::Date => {
                if change.date_format.is_empty() {
                    return Err(ComparisonError::Format {
                        value: candidate.to_json().to_string(),
                        format: String::new(),
                    });
                }
                candidate.newer_date(reference, &change.date_format)
            }
        }
    }
}
