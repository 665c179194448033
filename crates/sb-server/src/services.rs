use std::sync::Arc;

use sb_app::{BroadcastHub, GetLatestByType, GetRecentHistory, SubmitClipboardEntry};

/// Use cases and the hub, wired once at startup and shared by all routes.
pub struct AppServices {
    pub submit: SubmitClipboardEntry,
    pub history: GetRecentHistory,
    pub latest: GetLatestByType,
    pub hub: Arc<BroadcastHub>,
}
