//! Webhook delivery outcomes that are not terminal success.

use super::error_code::{self, FlareErrorCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeliveryError {
    #[error("endpoint answered {status}, delivery will be retried")]
    Transient { status: u16 },

    #[error("endpoint answered {status}, delivery discarded")]
    Discarded { status: u16 },

    #[error("transport failure: {reason}")]
    Transport { reason: String },

    #[error("invalid delivery request: {reason}")]
    InvalidRequest { reason: String },
}

impl DeliveryError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::Transport { .. })
    }
}

impl FlareErrorCode for DeliveryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Discarded { .. } => error_code::DELIVERY_DISCARDED,
            _ => error_code::DELIVERY_ERROR,
        }
    }
}
