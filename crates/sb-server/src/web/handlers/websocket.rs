use std::convert::Infallible;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use sb_app::BroadcastHub;
use tracing::{debug, error, info};
use warp::ws::{Message, WebSocket, Ws};
use warp::{Filter, Rejection, Reply};

/// WebSocket subscription endpoint.
///
/// Every connected client becomes one hub session and receives each
/// subsequently published entry as a JSON text frame, in publish order.
pub fn route(
    hub: Arc<BroadcastHub>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("ws")
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_hub(hub))
        .map(|ws: Ws, hub: Arc<BroadcastHub>| {
            ws.on_upgrade(move |socket| client_connected(hub, socket))
        })
}

fn with_hub(
    hub: Arc<BroadcastHub>,
) -> impl Filter<Extract = (Arc<BroadcastHub>,), Error = Infallible> + Clone {
    warp::any().map(move || hub.clone())
}

async fn client_connected(hub: Arc<BroadcastHub>, socket: WebSocket) {
    let (session_id, receiver) = hub.subscribe().await;
    let (mut ws_tx, mut ws_rx) = socket.split();

    // the completed upgrade is the subscription acknowledgment
    hub.activate(&session_id).await;
    info!(session_id = %session_id, "Client connected");

    let pump = async {
        while let Some(entry) = receiver.recv().await {
            let text = match serde_json::to_string(entry.as_ref()) {
                Ok(text) => text,
                Err(err) => {
                    error!(session_id = %session_id, error = %err, "Failed to encode broadcast entry");
                    continue;
                }
            };
            if ws_tx.send(Message::text(text)).await.is_err() {
                // peer is gone
                return;
            }
        }
        // the hub closed the session (slow-consumer eviction or heartbeat
        // timeout): tell the peer instead of leaving a socket that will
        // never receive another entry
        let _ = ws_tx.send(Message::close()).await;
    };

    let reader = async {
        while let Some(result) = ws_rx.next().await {
            match result {
                Ok(msg) => {
                    if msg.is_close() {
                        break;
                    }
                    // pings, pongs and heartbeat texts all count as liveness
                    hub.heartbeat(&session_id).await;
                }
                Err(err) => {
                    debug!(session_id = %session_id, error = %err, "WebSocket read error");
                    break;
                }
            }
        }
    };

    // whichever side finishes first tears the connection down: the pump ends
    // when the hub closes the session, the reader when the peer closes the
    // socket
    tokio::select! {
        _ = pump => {}
        _ = reader => {}
    }

    hub.unsubscribe(&session_id).await;
    info!(session_id = %session_id, "Client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::clipboard::ClipboardEntry;
    use sb_core::config::HubConfig;
    use sb_core::ids::DeviceId;
    use serde_json::Value;

    fn entry(id: i64, content: &str) -> ClipboardEntry {
        ClipboardEntry {
            id,
            device_id: DeviceId::from("d1"),
            content_type: "text/plain".to_string(),
            content: content.to_string(),
            created_at_ms: id,
        }
    }

    #[tokio::test]
    async fn test_connected_client_receives_published_entries() {
        let hub = Arc::new(BroadcastHub::new(HubConfig::default()));
        let filter = route(hub.clone());

        let mut client = warp::test::ws()
            .path("/ws")
            .handshake(filter)
            .await
            .expect("handshake");

        // the session registers during the upgrade; wait for it to be active
        while hub.active_session_count().await == 0 {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        hub.publish(entry(1, "hello")).await;

        let frame = client.recv().await.expect("broadcast frame");
        let body: Value = serde_json::from_str(frame.to_str().unwrap()).unwrap();
        assert_eq!(body["id"], 1);
        assert_eq!(body["content"], "hello");
        assert_eq!(body["deviceId"], "d1");
    }

    #[tokio::test]
    async fn test_reaped_session_gets_a_server_side_close() {
        let hub = Arc::new(BroadcastHub::new(HubConfig {
            heartbeat_timeout_ms: 50,
            reaper_interval_ms: 10,
            ..HubConfig::default()
        }));
        let _reaper = hub.spawn_reaper();
        let filter = route(hub.clone());

        let mut client = warp::test::ws()
            .path("/ws")
            .handshake(filter)
            .await
            .expect("handshake");
        while hub.active_session_count().await == 0 {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        // a client that never sends anything is evicted by the reaper and
        // must observe a close frame, not a socket that has gone silent
        client
            .recv_closed()
            .await
            .expect("server must close the socket after evicting the session");
        assert_eq!(hub.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_client_close_unsubscribes_session() {
        let hub = Arc::new(BroadcastHub::new(HubConfig::default()));
        let filter = route(hub.clone());

        let mut client = warp::test::ws()
            .path("/ws")
            .handshake(filter)
            .await
            .expect("handshake");
        while hub.session_count().await == 0 {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        client.send(Message::close()).await;
        drop(client);

        // the read loop tears the session down
        for _ in 0..100 {
            if hub.session_count().await == 0 {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("session was not removed after close");
    }
}
