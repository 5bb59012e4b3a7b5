//! WebSocket-backed MessagePusher implementation.
//!
//! The UI layer accepts each WebSocket, splits it and registers the
//! per-connection `UnboundedSender` here; the socket's pusher task drains
//! the matching receiver. This implementation only manages the sender map
//! and delivery:
//! - UI layer: connection accept, channel creation, the socket tasks
//! - Infrastructure layer: sender bookkeeping, best-effort delivery
//!
//! Delivery is fire-and-forget. A failed or missing target is logged and
//! skipped; the connection is removed only via the disconnect path.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// WebSocket-backed MessagePusher implementation
pub struct WebSocketMessagePusher {
    /// Outbound channels of the live connections
    connections: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register(&self, connection: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection);
        connections.insert(connection, sender);
    }

    async fn unregister(&self, connection: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection);
    }

    async fn try_send(&self, connection: &ConnectionId, content: &str) {
        let connections = self.connections.lock().await;
        match connections.get(connection) {
            Some(sender) => {
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!("Failed to push message to connection '{}': {}", connection, e);
                }
            }
            None => {
                tracing::warn!("Connection '{}' not found, dropping message", connection);
            }
        }
    }

    async fn send_to_connections(&self, targets: &[ConnectionId], content: &str) {
        let connections = self.connections.lock().await;
        for target in targets {
            match connections.get(target) {
                Some(sender) => {
                    // one failing target never aborts the rest
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push message to connection '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::warn!("Connection '{}' not found during send, skipping", target);
                }
            }
        }
    }

    async fn broadcast_all(&self, content: &str) {
        let connections = self.connections.lock().await;
        for (connection, sender) in connections.iter() {
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!(
                    "Failed to broadcast message to connection '{}': {}",
                    connection,
                    e
                );
            }
        }
    }
}
