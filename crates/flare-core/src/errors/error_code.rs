//! FlareErrorCode trait for boundary conversion.

/// Every error enum implements this to provide a structured error code
/// string for consumers at the HTTP or process boundary.
pub trait FlareErrorCode {
    /// Returns the error code string (e.g., "VALIDATION_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const COMPARISON_ERROR: &str = "COMPARISON_ERROR";
pub const ADDRESSING_ERROR: &str = "ADDRESSING_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
pub const PATH_CONFLICT: &str = "PATH_CONFLICT";
pub const UNSUPPORTED: &str = "UNSUPPORTED";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const PIPELINE_ERROR: &str = "PIPELINE_ERROR";
pub const TIMEOUT: &str = "TIMEOUT";
pub const WORKER_ERROR: &str = "WORKER_ERROR";
pub const DELIVERY_ERROR: &str = "DELIVERY_ERROR";
pub const DELIVERY_DISCARDED: &str = "DELIVERY_DISCARDED";
pub const TRIGGER_ERROR: &str = "TRIGGER_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
