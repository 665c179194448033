//! # sb-app
//!
//! Application orchestration layer for Shareboard: business logic use cases
//! and the broadcast hub that fans accepted entries out to subscriber
//! sessions.

pub mod hub;
pub mod usecases;

pub use hub::{BroadcastHub, SessionReceiver, SessionState};
pub use usecases::{GetLatestByType, GetRecentHistory, SubmitClipboardEntry, SubmitError};
