use thiserror::Error;

/// Failures of the durable entry store.
///
/// Not-found is never an error: lookups return `Ok(None)` instead.
/// Storage failures are surfaced to the caller and not retried internally.
#[derive(Debug, Error)]
pub enum EntryStoreError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("connection pool error: {0}")]
    Pool(String),
}
