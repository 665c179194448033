use anyhow::Result;

use crate::clipboard::ClipboardEntry;

/// Fan-out side of the core: delivers an accepted entry to every live
/// subscriber session.
///
/// Implementations must never block on a subscriber's consumption rate and
/// must never report per-subscriber delivery problems to the publisher;
/// a slow or dead subscriber is the implementation's own problem to evict.
#[async_trait::async_trait]
pub trait EntryPublisherPort: Send + Sync {
    async fn publish(&self, entry: &ClipboardEntry) -> Result<()>;
}
