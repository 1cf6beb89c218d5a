//! Top-level Flare configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DeliveryConfig, ObservabilityConfig, WorkerConfig};
use crate::constants::CONFIG_FILE_NAME;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`FLARE_*`)
/// 2. Project config (`flare.toml` in the given root)
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FlareConfig {
    pub worker: WorkerConfig,
    pub delivery: DeliveryConfig,
    pub observability: ObservabilityConfig,
}

impl FlareConfig {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("worker.concurrency", self.worker.concurrency as u64),
            ("worker.process_timeout_ms", self.worker.process_timeout_ms),
            ("worker.push_timeout_ms", self.worker.push_timeout_ms),
            ("worker.queue_capacity", self.worker.queue_capacity as u64),
            ("worker.max_attempts", u64::from(self.worker.max_attempts)),
            ("delivery.request_timeout_ms", self.delivery.request_timeout_ms),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        for (field, codes) in [
            ("delivery.default_success", &self.delivery.default_success),
            ("delivery.default_discard", &self.delivery.default_discard),
        ] {
            if let Some(code) = codes.iter().find(|c| !(100..=599).contains(*c)) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: format!("{code} is not an http status code"),
                });
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `FLARE_WORKER_CONCURRENCY`, `FLARE_DELIVERY_REQUEST_TIMEOUT_MS`, etc.
    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_parse("FLARE_WORKER_CONCURRENCY") {
            self.worker.concurrency = v;
        }
        if let Some(v) = env_parse("FLARE_WORKER_PROCESS_TIMEOUT_MS") {
            self.worker.process_timeout_ms = v;
        }
        if let Some(v) = env_parse("FLARE_WORKER_PUSH_TIMEOUT_MS") {
            self.worker.push_timeout_ms = v;
        }
        if let Some(v) = env_parse("FLARE_WORKER_QUEUE_CAPACITY") {
            self.worker.queue_capacity = v;
        }
        if let Some(v) = env_parse("FLARE_WORKER_MAX_ATTEMPTS") {
            self.worker.max_attempts = v;
        }
        if let Some(v) = env_parse("FLARE_DELIVERY_REQUEST_TIMEOUT_MS") {
            self.delivery.request_timeout_ms = v;
        }
        if let Ok(v) = std::env::var("FLARE_LOG_LEVEL") {
            self.observability.log_level = v;
        }
        if let Some(v) = env_parse("FLARE_LOG_JSON") {
            self.observability.json = v;
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
