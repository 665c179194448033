//! # sb-core
//!
//! Core domain models and business logic for Shareboard.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod clipboard;
pub mod config;
pub mod ids;
pub mod ports;

// Re-export commonly used types at the crate root
pub use clipboard::{ClipboardEntry, NewClipboardEntry};
pub use config::{AppConfig, HubConfig, OverflowPolicy, ServerConfig, StorageConfig};
pub use ids::{DeviceId, SessionId};
