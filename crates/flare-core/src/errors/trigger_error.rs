//! Fan-out failures reported after every subscription was attempted.

use super::error_code::{self, FlareErrorCode};

/// One subscription whose task could not be scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerFailure {
    pub subscription_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TriggerError {
    #[error("{failed} of {total} notifications could not be scheduled for document '{document_id}'")]
    Partial {
        document_id: String,
        total: usize,
        failed: usize,
        failures: Vec<TriggerFailure>,
    },
}

impl TriggerError {
    pub fn failures(&self) -> &[TriggerFailure] {
        match self {
            Self::Partial { failures, .. } => failures,
        }
    }
}

impl FlareErrorCode for TriggerError {
    fn error_code(&self) -> &'static str {
        error_code::TRIGGER_ERROR
    }
}
