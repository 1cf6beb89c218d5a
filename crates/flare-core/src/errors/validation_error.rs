//! Invariant violations on documents, resources, subscriptions, and pagination.

use super::error_code::{self, FlareErrorCode};

/// Raised synchronously by `valid()`; never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing document id")]
    MissingId,

    #[error("missing document revision")]
    MissingRevision,

    #[error("missing change field")]
    MissingChangeField,

    #[error("missing change kind")]
    MissingKind,

    #[error("unknown change kind '{kind}'")]
    UnknownKind { kind: String },

    #[error("missing date format for date change kind")]
    MissingDateFormat,

    #[error("revision is a {actual} but the resource expects a {expected}")]
    RevisionKindMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("revision '{value}' does not match date format '{format}'")]
    InvalidDate { value: String, format: String },

    #[error("invalid pagination: {field} must not be negative, got {value}")]
    NegativePagination { field: &'static str, value: i64 },

    #[error("invalid {field}: {message}")]
    InvalidField { field: String, message: String },
}

impl FlareErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        error_code::VALIDATION_ERROR
    }
}
