//! Worker construction and lifecycle errors.

use super::error_code::{self, FlareErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkerError {
    #[error("pusher not found")]
    MissingPusher,

    #[error("puller not found")]
    MissingPuller,

    #[error("processor not found")]
    MissingProcessor,

    #[error("invalid {field}: must be greater than zero")]
    InvalidTimeout { field: &'static str },

    #[error("invalid concurrency count {count}: must be at least 1")]
    InvalidConcurrency { count: usize },

    #[error("worker already started")]
    AlreadyStarted,

    #[error("worker stopped")]
    Stopped,
}

impl FlareErrorCode for WorkerError {
    fn error_code(&self) -> &'static str {
        error_code::WORKER_ERROR
    }
}
