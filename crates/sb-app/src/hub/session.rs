//! Per-subscriber session state and its bounded outbound buffer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sb_core::clipboard::ClipboardEntry;
use sb_core::config::{HubConfig, OverflowPolicy};
use sb_core::ids::SessionId;
use tokio::sync::Notify;

/// Lifecycle of a subscriber session.
///
/// `Connecting → Active` on handshake ack, `Active → Draining` when the
/// outbound buffer overflows, `Draining → Active` once the consumer catches
/// up, anything `→ Closed` on disconnect or eviction. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Active,
    Draining,
    Closed,
}

/// Result of a non-blocking enqueue attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnqueueOutcome {
    /// Entry buffered for delivery.
    Delivered,
    /// Buffer-full policy discarded an entry; the session stays live.
    Dropped,
    /// Session was not eligible (still connecting, or already closed).
    Skipped,
    /// Drop threshold exceeded; the session closed itself and must be
    /// removed from the live set.
    Evicted,
}

/// A session's outbound buffer plus its state machine.
///
/// Mutated only by the hub (enqueue, close) and the session's own receiver
/// (dequeue). The std mutex is held for a few queue operations at a time,
/// never across an await.
pub(crate) struct SessionQueue {
    inner: Mutex<QueueInner>,
    notify: Notify,
}

struct QueueInner {
    buf: VecDeque<Arc<ClipboardEntry>>,
    state: SessionState,
    drops_in_window: u32,
    window_started: Instant,
    last_seen: Instant,
}

impl SessionQueue {
    pub(crate) fn new() -> Self {
        let now = Instant::now();
        Self {
            inner: Mutex::new(QueueInner {
                buf: VecDeque::new(),
                state: SessionState::Connecting,
                drops_in_window: 0,
                window_started: now,
                last_seen: now,
            }),
            notify: Notify::new(),
        }
    }

    pub(crate) fn state(&self) -> SessionState {
        self.inner.lock().expect("session lock poisoned").state
    }

    /// Handshake acknowledged: the session starts receiving broadcasts.
    pub(crate) fn activate(&self) {
        let mut inner = self.inner.lock().expect("session lock poisoned");
        if inner.state == SessionState::Connecting {
            inner.state = SessionState::Active;
            inner.last_seen = Instant::now();
        }
    }

    pub(crate) fn heartbeat(&self) {
        let mut inner = self.inner.lock().expect("session lock poisoned");
        if inner.state != SessionState::Closed {
            inner.last_seen = Instant::now();
        }
    }

    pub(crate) fn is_expired(&self, timeout: Duration) -> bool {
        let inner = self.inner.lock().expect("session lock poisoned");
        inner.state != SessionState::Closed && inner.last_seen.elapsed() > timeout
    }

    /// Non-blocking enqueue with the configured buffer-full policy.
    pub(crate) fn enqueue(&self, entry: Arc<ClipboardEntry>, config: &HubConfig) -> EnqueueOutcome {
        let mut inner = self.inner.lock().expect("session lock poisoned");

        match inner.state {
            SessionState::Connecting | SessionState::Closed => return EnqueueOutcome::Skipped,
            SessionState::Active | SessionState::Draining => {}
        }

        if inner.buf.len() < config.buffer_capacity {
            inner.buf.push_back(entry);
            drop(inner);
            self.notify.notify_one();
            return EnqueueOutcome::Delivered;
        }

        // Buffer full: the session is not keeping up.
        inner.state = SessionState::Draining;

        if inner.window_started.elapsed() > Duration::from_millis(config.drop_window_ms) {
            inner.window_started = Instant::now();
            inner.drops_in_window = 0;
        }
        inner.drops_in_window += 1;

        if inner.drops_in_window > config.max_drops {
            inner.state = SessionState::Closed;
            inner.buf.clear();
            drop(inner);
            self.notify.notify_one();
            return EnqueueOutcome::Evicted;
        }

        match config.overflow {
            OverflowPolicy::DropOldest => {
                inner.buf.pop_front();
                inner.buf.push_back(entry);
                drop(inner);
                self.notify.notify_one();
            }
            OverflowPolicy::DropNewest => {}
        }
        EnqueueOutcome::Dropped
    }

    /// Await the next buffered entry; `None` once the session is closed.
    pub(crate) async fn recv(&self) -> Option<Arc<ClipboardEntry>> {
        loop {
            {
                let mut inner = self.inner.lock().expect("session lock poisoned");
                if let Some(entry) = inner.buf.pop_front() {
                    if inner.state == SessionState::Draining && inner.buf.is_empty() {
                        // consumer caught up
                        inner.state = SessionState::Active;
                    }
                    return Some(entry);
                }
                if inner.state == SessionState::Closed {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    /// Terminal transition; idempotent. Pending buffered entries are
    /// discarded with the session.
    pub(crate) fn close(&self) {
        let mut inner = self.inner.lock().expect("session lock poisoned");
        if inner.state != SessionState::Closed {
            inner.state = SessionState::Closed;
            inner.buf.clear();
        }
        drop(inner);
        self.notify.notify_one();
    }
}

/// Receiving half of a subscriber session, handed out by
/// [`BroadcastHub::subscribe`](crate::hub::BroadcastHub::subscribe).
pub struct SessionReceiver {
    session_id: SessionId,
    queue: Arc<SessionQueue>,
}

impl SessionReceiver {
    pub(crate) fn new(session_id: SessionId, queue: Arc<SessionQueue>) -> Self {
        Self { session_id, queue }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Next broadcast entry for this session, or `None` once the session is
    /// closed and will never yield again.
    pub async fn recv(&self) -> Option<Arc<ClipboardEntry>> {
        self.queue.recv().await
    }
}
