//! Clipboard domain model.

pub mod entry;

pub use entry::{ClipboardEntry, NewClipboardEntry, DEFAULT_CONTENT_TYPE};
