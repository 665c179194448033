use std::sync::Arc;

use sb_core::clipboard::{ClipboardEntry, NewClipboardEntry, DEFAULT_CONTENT_TYPE};
use sb_core::ids::DeviceId;
use sb_core::ports::{EntryPublisherPort, EntryStoreError, EntryStorePort};
use thiserror::Error;
use tracing::{info_span, warn, Instrument};

/// Accepts a new clipboard entry: validate, persist, then broadcast.
///
/// The store insert (and with it the history cache update) strictly precedes
/// the broadcast, so a client that queries history right after receiving the
/// broadcast observes consistent state. A submission that fails validation or
/// storage is rejected before any broadcast happens.
pub struct SubmitClipboardEntry {
    store: Arc<dyn EntryStorePort>,
    publisher: Arc<dyn EntryPublisherPort>,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Missing required field; reported to the caller, never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// Durable write failed; surfaced to the caller, who may retry.
    #[error(transparent)]
    Storage(#[from] EntryStoreError),
}

impl SubmitClipboardEntry {
    pub fn new(store: Arc<dyn EntryStorePort>, publisher: Arc<dyn EntryPublisherPort>) -> Self {
        Self { store, publisher }
    }

    pub async fn execute(
        &self,
        device_id: &str,
        content_type: Option<&str>,
        content: &str,
    ) -> Result<ClipboardEntry, SubmitError> {
        let span = info_span!(
            "usecase.clipboard.submit.execute",
            device_id = %device_id,
        );

        async move {
            let device_id = DeviceId::from(device_id);
            if !device_id.is_valid() {
                return Err(SubmitError::Validation("deviceId must not be empty".into()));
            }
            if content.is_empty() {
                return Err(SubmitError::Validation("content must not be empty".into()));
            }

            let content_type = match content_type {
                Some(ct) if !ct.trim().is_empty() => ct.to_string(),
                _ => DEFAULT_CONTENT_TYPE.to_string(),
            };

            let entry = self
                .store
                .insert(NewClipboardEntry::new(device_id, content_type, content))
                .await?;

            // Subscriber delivery problems are the hub's to handle; a failed
            // broadcast must not turn an already-persisted entry into an error.
            if let Err(err) = self.publisher.publish(&entry).await {
                warn!(entry_id = entry.id, error = %err, "Broadcast after persist failed");
            }

            Ok(entry)
        }
        .instrument(span)
        .await
    }
}
