//! Capability seams implemented by storage adapters and the notifier.

pub mod repository;
pub mod trigger;

pub use repository::{DocumentRepository, ResourceRepository, SubscriptionRepository};
pub use trigger::{SubscriptionTrigger, TriggerHandler, TriggerReport};
