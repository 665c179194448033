//! Business logic use cases

pub mod latest_by_type;
pub mod recent_history;
pub mod submit_entry;

pub use latest_by_type::GetLatestByType;
pub use recent_history::GetRecentHistory;
pub use submit_entry::{SubmitClipboardEntry, SubmitError};
