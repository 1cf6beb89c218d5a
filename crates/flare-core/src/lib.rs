//! # flare-core
//!
//! Foundation crate for Flare.
//! Defines the revision comparison engine, resource addressing, subscription
//! delivery policy, errors, config, repository traits, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tracing;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::FlareConfig;
pub use errors::{FlareError, FlareResult};
pub use models::{
    Document, Pagination, Resource, ResourceChange, RevisionKind, RevisionValue, Subscription,
    SubscriptionAction, SubscriptionDelivery, SubscriptionEndpoint,
};
