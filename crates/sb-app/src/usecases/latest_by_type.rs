use std::sync::Arc;

use sb_core::clipboard::ClipboardEntry;
use sb_core::ports::{EntryStoreError, EntryStorePort};

/// Read path for the latest-entry-of-a-type query.
///
/// `Ok(None)` is the not-found signal; it is a valid empty result, not an
/// error, and the ingress layer maps it to 404.
pub struct GetLatestByType {
    store: Arc<dyn EntryStorePort>,
}

impl GetLatestByType {
    pub fn new(store: Arc<dyn EntryStorePort>) -> Self {
        Self { store }
    }

    pub async fn execute(
        &self,
        content_type: &str,
    ) -> Result<Option<ClipboardEntry>, EntryStoreError> {
        self.store.latest_by_type(content_type).await
    }
}
