use diesel::prelude::*;
use sb_core::clipboard::{ClipboardEntry, NewClipboardEntry};
use sb_core::ids::DeviceId;

use crate::db::schema::clipboard_entries;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = clipboard_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClipboardEntryRow {
    pub id: i64,
    pub device_id: String,
    pub content_type: String,
    pub content: String,
    pub created_at_ms: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = clipboard_entries)]
pub struct NewClipboardEntryRow {
    pub device_id: String,
    pub content_type: String,
    pub content: String,
    pub created_at_ms: i64,
}

impl ClipboardEntryRow {
    pub fn into_domain(self) -> ClipboardEntry {
        ClipboardEntry {
            id: self.id,
            device_id: DeviceId::from(self.device_id),
            content_type: self.content_type,
            content: self.content,
            created_at_ms: self.created_at_ms,
        }
    }
}

impl NewClipboardEntryRow {
    pub fn from_domain(new: NewClipboardEntry, created_at_ms: i64) -> Self {
        Self {
            device_id: new.device_id.into_inner(),
            content_type: new.content_type,
            content: new.content,
            created_at_ms,
        }
    }
}
