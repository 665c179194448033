//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. This follows Hexagonal Architecture
//! principles, allowing the core business logic to remain independent of
//! external dependencies.

pub mod entry_store;
pub mod errors;
pub mod publisher;

pub use entry_store::EntryStorePort;
pub use errors::EntryStoreError;
pub use publisher::EntryPublisherPort;
