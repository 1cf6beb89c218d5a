//! Configuration system for Flare.
//! TOML-based, 3-layer resolution: env > project file > defaults.

pub mod defaults;
pub mod delivery_config;
pub mod flare_config;
pub mod observability_config;
pub mod worker_config;

pub use delivery_config::DeliveryConfig;
pub use flare_config::FlareConfig;
pub use observability_config::ObservabilityConfig;
pub use worker_config::WorkerConfig;
