use std::sync::Mutex;

use chrono::Utc;
use diesel::prelude::*;
use sb_core::clipboard::{ClipboardEntry, NewClipboardEntry};
use sb_core::ports::{EntryStoreError, EntryStorePort};

use crate::db::models::{ClipboardEntryRow, NewClipboardEntryRow};
use crate::db::schema::clipboard_entries;
use crate::db::DbExecutor;

/// Diesel/SQLite implementation of the durable entry store.
///
/// `id` assignment is delegated to the SQLite AUTOINCREMENT rowid, which is
/// strictly increasing; SQLite serializes writes, so concurrent inserts can
/// never observe duplicate ids. `created_at_ms` assignment is serialized with
/// the insert it belongs to (see `clock_floor`), so timestamp order can never
/// contradict id order.
pub struct DieselEntryStore<E> {
    executor: E,
    // Held across clock read + insert so two concurrent submissions cannot
    // commit in the opposite order of their timestamps. Doubles as a
    // monotonic floor against wall-clock steps.
    clock_floor: Mutex<i64>,
}

impl<E> DieselEntryStore<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            clock_floor: Mutex::new(0),
        }
    }
}

fn storage_err(e: diesel::result::Error) -> EntryStoreError {
    EntryStoreError::Storage(e.to_string())
}

#[async_trait::async_trait]
impl<E> EntryStorePort for DieselEntryStore<E>
where
    E: DbExecutor,
{
    async fn insert(&self, new: NewClipboardEntry) -> Result<ClipboardEntry, EntryStoreError> {
        // The executor runs inline, so the lock is never held across an await.
        let mut floor = self.clock_floor.lock().expect("store clock lock poisoned");
        let created_at_ms = Utc::now().timestamp_millis().max(*floor);
        *floor = created_at_ms;
        let new_row = NewClipboardEntryRow::from_domain(new, created_at_ms);

        self.executor.run(|conn| {
            let row: ClipboardEntryRow = diesel::insert_into(clipboard_entries::table)
                .values(&new_row)
                .returning(ClipboardEntryRow::as_returning())
                .get_result(conn)
                .map_err(storage_err)?;

            Ok(row.into_domain())
        })
    }

    async fn recent_history(&self, limit: usize) -> Result<Vec<ClipboardEntry>, EntryStoreError> {
        self.executor.run(|conn| {
            let rows = clipboard_entries::table
                .order((
                    clipboard_entries::created_at_ms.desc(),
                    clipboard_entries::id.desc(),
                ))
                .limit(limit as i64)
                .load::<ClipboardEntryRow>(conn)
                .map_err(storage_err)?;

            Ok(rows.into_iter().map(ClipboardEntryRow::into_domain).collect())
        })
    }

    async fn latest_by_type(
        &self,
        content_type: &str,
    ) -> Result<Option<ClipboardEntry>, EntryStoreError> {
        self.executor.run(|conn| {
            let row = clipboard_entries::table
                .filter(clipboard_entries::content_type.eq(content_type))
                .order((
                    clipboard_entries::created_at_ms.desc(),
                    clipboard_entries::id.desc(),
                ))
                .first::<ClipboardEntryRow>(conn)
                .optional()
                .map_err(storage_err)?;

            Ok(row.map(ClipboardEntryRow::into_domain))
        })
    }
}
