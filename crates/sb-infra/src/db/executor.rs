use std::sync::Arc;

use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use sb_core::ports::EntryStoreError;

/// Runs a closure against a database connection.
///
/// Keeps the repository code independent of pooling details and lets tests
/// substitute a failing executor.
pub trait DbExecutor: Send + Sync {
    fn run<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> Result<T, EntryStoreError>,
    ) -> Result<T, EntryStoreError>;
}

pub struct DieselSqliteExecutor {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl DieselSqliteExecutor {
    pub fn new(pool: Pool<ConnectionManager<SqliteConnection>>) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

impl DbExecutor for DieselSqliteExecutor {
    fn run<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> Result<T, EntryStoreError>,
    ) -> Result<T, EntryStoreError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| EntryStoreError::Pool(e.to_string()))?;
        f(&mut conn)
    }
}
