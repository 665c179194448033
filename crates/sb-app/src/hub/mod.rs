//! Broadcast hub: fans every accepted entry out to all live subscriber
//! sessions without letting a slow or dead subscriber stall anyone else.

mod session;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sb_core::clipboard::ClipboardEntry;
use sb_core::config::HubConfig;
use sb_core::ids::SessionId;
use sb_core::ports::EntryPublisherPort;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use session::{SessionReceiver, SessionState};
use session::{EnqueueOutcome, SessionQueue};

/// Registry of live subscriber sessions.
///
/// Sessions are owned exclusively by the hub: each holds an independent
/// bounded outbound buffer, so one stalled consumer never back-pressures the
/// publisher or its peers. Publication takes a snapshot of the live set and
/// delivers after releasing the lock, keeping `publish` O(live sessions)
/// with no lock held across delivery.
pub struct BroadcastHub {
    config: HubConfig,
    sessions: RwLock<HashMap<SessionId, Arc<SessionQueue>>>,
}

impl BroadcastHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new session in `Connecting` state and hand out its
    /// receiving half.
    pub async fn subscribe(&self) -> (SessionId, SessionReceiver) {
        let session_id = SessionId::new();
        let queue = Arc::new(SessionQueue::new());

        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.clone(), queue.clone());
        debug!(session_id = %session_id, live = sessions.len(), "Subscriber registered");

        (session_id.clone(), SessionReceiver::new(session_id, queue))
    }

    /// Handshake acknowledged: the session starts receiving broadcasts.
    pub async fn activate(&self, session_id: &SessionId) {
        let sessions = self.sessions.read().await;
        if let Some(queue) = sessions.get(session_id) {
            queue.activate();
            debug!(session_id = %session_id, "Subscriber active");
        }
    }

    /// Keep-alive signal from the session's connection.
    pub async fn heartbeat(&self, session_id: &SessionId) {
        let sessions = self.sessions.read().await;
        if let Some(queue) = sessions.get(session_id) {
            queue.heartbeat();
        }
    }

    /// Close a session and remove it from the live set. Idempotent.
    pub async fn unsubscribe(&self, session_id: &SessionId) {
        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(session_id)
        };
        if let Some(queue) = removed {
            queue.close();
            debug!(session_id = %session_id, "Subscriber removed");
        }
    }

    /// Deliver an entry to every live session.
    ///
    /// Never blocks on subscriber consumption and never fails on subscriber
    /// delivery problems; a session that exceeds its drop threshold is
    /// evicted here, all others are unaffected.
    pub async fn publish(&self, entry: ClipboardEntry) {
        let entry = Arc::new(entry);

        // Snapshot under the read lock, deliver after releasing it, so a
        // concurrent connect/disconnect never waits on fan-out.
        let snapshot: Vec<(SessionId, Arc<SessionQueue>)> = {
            let sessions = self.sessions.read().await;
            sessions
                .iter()
                .map(|(id, queue)| (id.clone(), queue.clone()))
                .collect()
        };

        let mut evicted = Vec::new();
        for (session_id, queue) in snapshot {
            match queue.enqueue(entry.clone(), &self.config) {
                EnqueueOutcome::Delivered | EnqueueOutcome::Skipped => {}
                EnqueueOutcome::Dropped => {
                    debug!(session_id = %session_id, entry_id = entry.id, "Slow consumer dropped an entry");
                }
                EnqueueOutcome::Evicted => {
                    warn!(session_id = %session_id, "Evicting slow consumer");
                    evicted.push(session_id);
                }
            }
        }

        if !evicted.is_empty() {
            let mut sessions = self.sessions.write().await;
            for session_id in evicted {
                sessions.remove(&session_id);
            }
        }
    }

    /// Current state of a session, if it is still in the live set.
    pub async fn session_state(&self, session_id: &SessionId) -> Option<SessionState> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).map(|queue| queue.state())
    }

    /// Number of sessions in the live set.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of live sessions that completed their handshake.
    pub async fn active_session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|queue| queue.state() == SessionState::Active)
            .count()
    }

    /// Background task that evicts sessions whose connection went silent for
    /// longer than the configured heartbeat timeout.
    pub fn spawn_reaper(self: &Arc<Self>) -> JoinHandle<()> {
        let hub = Arc::clone(self);
        let interval = Duration::from_millis(hub.config.reaper_interval_ms);
        let timeout = Duration::from_millis(hub.config.heartbeat_timeout_ms);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;

                let expired: Vec<SessionId> = {
                    let sessions = hub.sessions.read().await;
                    sessions
                        .iter()
                        .filter(|(_, queue)| queue.is_expired(timeout))
                        .map(|(id, _)| id.clone())
                        .collect()
                };

                if expired.is_empty() {
                    continue;
                }

                let mut sessions = hub.sessions.write().await;
                for session_id in expired {
                    if let Some(queue) = sessions.remove(&session_id) {
                        queue.close();
                        info!(session_id = %session_id, "Evicted session after heartbeat timeout");
                    }
                }
            }
        })
    }
}

#[async_trait::async_trait]
impl EntryPublisherPort for BroadcastHub {
    async fn publish(&self, entry: &ClipboardEntry) -> Result<()> {
        BroadcastHub::publish(self, entry.clone()).await;
        Ok(())
    }
}
