//! Storage adapter errors, classified by kind rather than by concrete type.

use super::error_code::{self, FlareErrorCode};
use super::validation_error::ValidationError;

/// Classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    NotFound,
    AlreadyExists,
    PathConflict,
    Unsupported,
    /// The record failed validation before it was stored.
    Invalid,
    Backend,
}

/// Single repository error type carrying its kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RepositoryError {
    kind: RepositoryErrorKind,
    message: String,
}

impl RepositoryError {
    pub fn new(kind: RepositoryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RepositoryErrorKind::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(RepositoryErrorKind::AlreadyExists, message)
    }

    pub fn path_conflict(message: impl Into<String>) -> Self {
        Self::new(RepositoryErrorKind::PathConflict, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(RepositoryErrorKind::Unsupported, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(RepositoryErrorKind::Invalid, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(RepositoryErrorKind::Backend, message)
    }

    pub fn kind(&self) -> RepositoryErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == RepositoryErrorKind::NotFound
    }

    pub fn is_already_exists(&self) -> bool {
        self.kind == RepositoryErrorKind::AlreadyExists
    }

    pub fn is_path_conflict(&self) -> bool {
        self.kind == RepositoryErrorKind::PathConflict
    }

    pub fn is_invalid(&self) -> bool {
        self.kind == RepositoryErrorKind::Invalid
    }
}

impl From<ValidationError> for RepositoryError {
    fn from(err: ValidationError) -> Self {
        Self::invalid(err.to_string())
    }
}

impl FlareErrorCode for RepositoryError {
    fn error_code(&self) -> &'static str {
        match self.kind {
            RepositoryErrorKind::NotFound => error_code::NOT_FOUND,
            RepositoryErrorKind::AlreadyExists => error_code::ALREADY_EXISTS,
            RepositoryErrorKind::PathConflict => error_code::PATH_CONFLICT,
            RepositoryErrorKind::Unsupported => error_code::UNSUPPORTED,
            RepositoryErrorKind::Invalid => error_code::VALIDATION_ERROR,
            RepositoryErrorKind::Backend => error_code::STORAGE_ERROR,
        }
    }
}
