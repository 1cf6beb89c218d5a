//! Error handling for Flare.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod addressing_error;
pub mod comparison_error;
pub mod config_error;
pub mod delivery_error;
pub mod error_code;
pub mod pipeline_error;
pub mod repository_error;
pub mod trigger_error;
pub mod validation_error;
pub mod worker_error;

pub use addressing_error::AddressingError;
pub use comparison_error::ComparisonError;
pub use config_error::ConfigError;
pub use delivery_error::DeliveryError;
pub use error_code::FlareErrorCode;
pub use pipeline_error::PipelineError;
pub use repository_error::{RepositoryError, RepositoryErrorKind};
pub use trigger_error::{TriggerError, TriggerFailure};
pub use validation_error::ValidationError;
pub use worker_error::WorkerError;

/// Top-level error aggregating every subsystem error via `From`.
#[derive(Debug, thiserror::Error)]
pub enum FlareError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Comparison error: {0}")]
    Comparison(#[from] ComparisonError),

    #[error("Addressing error: {0}")]
    Addressing(#[from] AddressingError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Trigger error: {0}")]
    Trigger(#[from] TriggerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type FlareResult<T> = Result<T, FlareError>;

impl FlareErrorCode for FlareError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Comparison(e) => e.error_code(),
            Self::Addressing(e) => e.error_code(),
            Self::Repository(e) => e.error_code(),
            Self::Pipeline(e) => e.error_code(),
            Self::Worker(e) => e.error_code(),
            Self::Delivery(e) => e.error_code(),
            Self::Trigger(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Serialization(_) => error_code::SERIALIZATION_ERROR,
        }
    }
}

impl FlareError {
    /// Whether the error rejects the caller's write (4xx at an HTTP boundary).
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Comparison(_) | Self::Addressing(_) => true,
            Self::Repository(e) => {
                e.is_not_found() || e.is_already_exists() || e.is_path_conflict() || e.is_invalid()
            }
            _ => false,
        }
    }
}
