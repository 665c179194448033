use std::sync::Arc;

use sb_core::clipboard::ClipboardEntry;
use sb_core::ports::{EntryStoreError, EntryStorePort};

/// Read path for the recent-history query.
///
/// Pure delegation to the (cache-fronted) entry store; the bound is the
/// configured history window, 20 by default.
pub struct GetRecentHistory {
    store: Arc<dyn EntryStorePort>,
    limit: usize,
}

impl GetRecentHistory {
    pub fn new(store: Arc<dyn EntryStorePort>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Up to `limit` most recent entries, newest first.
    pub async fn execute(&self) -> Result<Vec<ClipboardEntry>, EntryStoreError> {
        self.store.recent_history(self.limit).await
    }
}
