//! # flare-delivery
//!
//! Everything between an accepted document change and the webhook call:
//! the task envelope pushed through the worker, the reqwest-based
//! processor that delivers it, the notifier that fans tasks out per
//! subscription, and the document update flow that decides whether a
//! change is accepted at all.

pub mod body;
pub mod notifier;
pub mod processor;
pub mod service;
pub mod task;

pub use notifier::Notifier;
pub use processor::HttpProcessor;
pub use service::{DocumentService, UpdateOutcome};
pub use task::DeliveryTask;
