//! Push / pull / process failures inside the worker pipeline.

use std::time::Duration;

use super::error_code::{self, FlareErrorCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("error during task push: {reason}")]
    Push { reason: String },

    #[error("task push timed out after {timeout:?}")]
    PushTimeout { timeout: Duration },

    #[error("error during task pull: {reason}")]
    Pull { reason: String },

    #[error("error during task process: {reason}")]
    Process { reason: String, retryable: bool },

    #[error("task process timed out after {timeout:?}")]
    ProcessTimeout { timeout: Duration },

    #[error("task processing panicked: {reason}")]
    Panicked { reason: String },

    #[error("task encode failed: {reason}")]
    Encode { reason: String },

    #[error("task decode failed: {reason}")]
    Decode { reason: String },

    #[error("queue closed")]
    Closed,
}

impl PipelineError {
    /// Whether the Puller may hand the task out again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Process { retryable, .. } => *retryable,
            Self::ProcessTimeout { .. } | Self::Panicked { .. } => true,
            _ => false,
        }
    }
}

impl FlareErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PushTimeout { .. } | Self::ProcessTimeout { .. } => error_code::TIMEOUT,
            _ => error_code::PIPELINE_ERROR,
        }
    }
}
