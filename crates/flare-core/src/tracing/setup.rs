//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Log targets the configured level applies to.
const FLARE_TARGETS: [&str; 5] = [
    "flare",
    "flare_core",
    "flare_storage",
    "flare_worker",
    "flare_delivery",
];

/// Initialize logging from `FLARE_LOG`, falling back to `flare=info`.
///
/// Format: `FLARE_LOG=flare_worker=debug,flare_delivery=info`.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    init_tracing_with(&ObservabilityConfig::default());
}

/// Initialize logging with a configured default level and output format.
/// `FLARE_LOG` still wins when set and valid.
pub fn init_tracing_with(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let fallback = FLARE_TARGETS
            .iter()
            .map(|target| format!("{target}={}", config.log_level))
            .collect::<Vec<_>>()
            .join(",");
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_new(&fallback))
            .unwrap_or_else(|_| EnvFilter::new("flare=info"));

        let registry = tracing_subscriber::registry().with(filter);
        let result = if config.json {
            registry
                .with(fmt::layer().json().with_target(true).with_thread_ids(true))
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
        };
        if result.is_err() {
            ::tracing::debug!("global tracing subscriber already installed");
        }
    });
}
