use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::DeviceId;

/// Content type assumed when a submission does not carry one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// A single shared clipboard entry.
///
/// Immutable once created: `id` and `created_at_ms` are assigned exactly once
/// by the entry store at insert time, never by the caller. History ordering is
/// `created_at_ms` descending with ties broken by `id` descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardEntry {
    /// Store-assigned monotonically increasing identifier.
    pub id: i64,

    /// Originating device.
    pub device_id: DeviceId,

    /// Free-text MIME-like tag, e.g. "text/plain" or "image/png".
    /// Partition key for latest-by-type queries.
    pub content_type: String,

    /// Payload, text or base64-encoded binary. The core enforces no size limit.
    pub content: String,

    /// Server-assigned acceptance time, epoch milliseconds.
    #[serde(rename = "createdAt")]
    pub created_at_ms: i64,
}

impl ClipboardEntry {
    /// Acceptance time as a chrono timestamp.
    pub fn created_at(&self) -> chrono::DateTime<Utc> {
        Utc.timestamp_millis_opt(self.created_at_ms)
            .single()
            .unwrap_or(chrono::DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// An entry as submitted by a device, before the store assigned
/// `id` and `created_at_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClipboardEntry {
    pub device_id: DeviceId,
    pub content_type: String,
    pub content: String,
}

impl NewClipboardEntry {
    pub fn new(
        device_id: impl Into<DeviceId>,
        content_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            content_type: content_type.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> ClipboardEntry {
        ClipboardEntry {
            id: 7,
            device_id: DeviceId::from("desktop-pc"),
            content_type: "text/plain".to_string(),
            content: "hello".to_string(),
            created_at_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_serializes_with_camel_case_wire_names() {
        let json = serde_json::to_value(entry()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["deviceId"], "desktop-pc");
        assert_eq!(json["contentType"], "text/plain");
        assert_eq!(json["content"], "hello");
        assert_eq!(json["createdAt"], 1_700_000_000_000i64);
    }

    #[test]
    fn test_round_trips_through_json() {
        let entry = entry();
        let json = serde_json::to_string(&entry).unwrap();
        let back: ClipboardEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_created_at_matches_millis() {
        let entry = entry();
        assert_eq!(entry.created_at().timestamp_millis(), entry.created_at_ms);
    }
}
