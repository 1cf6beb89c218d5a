//! Errors raised while deciding whether a revision is newer.

use super::error_code::{self, FlareErrorCode};

/// A proposed update that fails comparison is rejected and not persisted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComparisonError {
    #[error("revision type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("revision '{value}' could not be parsed with format '{format}'")]
    Format { value: String, format: String },

    #[error("unsupported change kind '{kind}'")]
    UnsupportedKind { kind: String },
}

impl FlareErrorCode for ComparisonError {
    fn error_code(&self) -> &'static str {
        error_code::COMPARISON_ERROR
    }
}
