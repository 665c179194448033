use crate::clipboard::{ClipboardEntry, NewClipboardEntry};
use crate::ports::errors::EntryStoreError;

/// Durable append-only record of clipboard entries.
///
/// The store assigns `id` (monotonically increasing) and `created_at_ms` at
/// insert time. Concurrent inserts must never produce duplicate ids.
#[async_trait::async_trait]
pub trait EntryStorePort: Send + Sync {
    /// Persist a new entry and return it with `id` and `created_at_ms` assigned.
    async fn insert(&self, new: NewClipboardEntry) -> Result<ClipboardEntry, EntryStoreError>;

    /// Most recent `limit` entries, newest first.
    async fn recent_history(&self, limit: usize) -> Result<Vec<ClipboardEntry>, EntryStoreError>;

    /// Most recent entry with the given content type, or `Ok(None)` when the
    /// type was never submitted.
    async fn latest_by_type(
        &self,
        content_type: &str,
    ) -> Result<Option<ClipboardEntry>, EntryStoreError>;
}
