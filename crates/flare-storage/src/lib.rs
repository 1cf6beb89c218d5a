//! # flare-storage
//!
//! In-memory adapters for the Flare repository traits.
//! Concurrent access goes through `DashMap`; every read returns a cloned
//! snapshot so no map guard is held across an `.await`.

pub mod document;
pub mod resource;
pub mod subscription;

pub use document::MemoryDocumentRepository;
pub use resource::MemoryResourceRepository;
pub use subscription::MemorySubscriptionRepository;
