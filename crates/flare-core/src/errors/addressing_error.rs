//! Wildcard resolution failures.

use super::error_code::{self, FlareErrorCode};

/// Rejects the operation before any queue interaction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AddressingError {
    #[error("malformed id '{id}': {reason}")]
    MalformedId { id: String, reason: String },

    #[error("revision cannot be rendered: {reason}")]
    InvalidRevision { reason: String },

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FlareErrorCode for AddressingError {
    fn error_code(&self) -> &'static str {
        error_code::ADDRESSING_ERROR
    }
}
