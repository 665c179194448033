diesel::table! {
    clipboard_entries (id) {
        id -> BigInt,
        device_id -> Text,
        content_type -> Text,
        content -> Text,
        created_at_ms -> BigInt,
    }
}
